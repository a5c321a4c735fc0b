//! Scene model
//!
//! The scene is the single source of truth between renders: every placed
//! image with its committed geometry, plus the glyph and message text. The
//! image list is kept in paint order (last entry on top), so z-order is the
//! list order and selecting an image moves it to the end.

use kurbo::Point;
use std::sync::Arc;
use tracing::debug;

use super::image_entity::{EntityId, ImageEntity, ImageGeometry};
use super::text_entity::{TextEntity, TextRole};
use crate::core::config::CardSettings;
use crate::io::image_loader::Bitmap;

#[derive(Debug, Clone)]
pub struct Scene {
    /// Paint order, bottom first
    images: Vec<ImageEntity>,
    next_id: u64,
    pub glyph: TextEntity,
    pub message: Option<TextEntity>,
}

impl Scene {
    pub fn new(glyph: TextEntity, message: Option<TextEntity>) -> Self {
        Self {
            images: Vec::new(),
            next_id: 1,
            glyph,
            message,
        }
    }

    /// Default glyph and message using the configured fonts and colors
    pub fn with_defaults(settings: &CardSettings) -> Self {
        let mut glyph = TextEntity::glyph_default(settings.default_glyph_font.clone());
        glyph.color = settings.text.glyph_color;
        glyph.stroke_width = settings.text.stroke_width;
        let mut message = TextEntity::message_default(settings.default_message_font.clone());
        message.color = settings.text.message_color;
        Self::new(glyph, Some(message))
    }

    pub fn text(&self, role: TextRole) -> Option<&TextEntity> {
        match role {
            TextRole::Glyph => Some(&self.glyph),
            TextRole::Message => self.message.as_ref(),
        }
    }

    pub fn text_mut(&mut self, role: TextRole) -> Option<&mut TextEntity> {
        match role {
            TextRole::Glyph => Some(&mut self.glyph),
            TextRole::Message => self.message.as_mut(),
        }
    }

    /// Default placement for a freshly dropped bitmap: canonical width,
    /// natural aspect ratio, centered on the canvas
    pub fn default_geometry(bitmap: &Bitmap, settings: &CardSettings) -> ImageGeometry {
        ImageGeometry::centered(
            settings.canvas_center(),
            settings.interaction.default_image_width,
            bitmap.aspect_ratio(),
        )
    }

    /// Place a new image on top of the stack
    pub fn add_image(&mut self, source: Arc<Bitmap>, settings: &CardSettings) -> EntityId {
        let geometry = Self::default_geometry(&source, settings);
        let id = EntityId(self.next_id);
        self.next_id += 1;
        debug!(
            "Added image {} from {:?} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            id,
            source.source(),
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height
        );
        self.images.push(ImageEntity::new(id, source, geometry));
        id
    }

    /// Images in paint order, bottom first
    pub fn images(&self) -> &[ImageEntity] {
        &self.images
    }

    pub fn z_order(&self) -> Vec<EntityId> {
        self.images.iter().map(|image| image.id).collect()
    }

    pub fn image(&self, id: EntityId) -> Option<&ImageEntity> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn image_mut(&mut self, id: EntityId) -> Option<&mut ImageEntity> {
        self.images.iter_mut().find(|image| image.id == id)
    }

    /// Topmost image whose box contains `point`
    pub fn hit_test(&self, point: Point) -> Option<EntityId> {
        self.images
            .iter()
            .rev()
            .find(|image| image.geometry.contains(point))
            .map(|image| image.id)
    }

    /// Select one image, clearing every other selection and raising it to
    /// the top of the paint order
    pub fn select(&mut self, id: EntityId) -> bool {
        let Some(index) = self.images.iter().position(|image| image.id == id) else {
            return false;
        };
        for image in &mut self.images {
            image.selected = false;
        }
        let mut entity = self.images.remove(index);
        entity.selected = true;
        self.images.push(entity);
        true
    }

    pub fn clear_selection(&mut self) {
        for image in &mut self.images {
            image.selected = false;
        }
    }

    pub fn selected_id(&self) -> Option<EntityId> {
        self.images
            .iter()
            .find(|image| image.selected)
            .map(|image| image.id)
    }

    pub fn selected_count(&self) -> usize {
        self.images.iter().filter(|image| image.selected).count()
    }

    /// Remove an image; no other image becomes selected
    pub fn remove_image(&mut self, id: EntityId) -> Option<ImageEntity> {
        let index = self.images.iter().position(|image| image.id == id)?;
        let removed = self.images.remove(index);
        debug!("Removed image {}", id);
        Some(removed)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}
