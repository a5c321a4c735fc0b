//! Card session
//!
//! The session owns everything one card needs: the scene, the font cache,
//! the cached outlines of the glyph and the message, and the interaction
//! controller with its live nodes. Both the window and the headless export
//! drive the card through it.
//!
//! Outlines can be extracted synchronously (`refresh_masks`) or through
//! [`OutlineJob`]s that run on another thread and report back with
//! [`CardSession::complete_outline`]; results for superseded inputs are
//! dropped.

use bevy::prelude::Resource;
use kurbo::Point;
use std::path::Path;
use std::sync::Arc;
use tiny_skia::Pixmap;
use tracing::{debug, info};

use super::{EntityId, OutlineKey, Scene, TextEntity, TextRole};
use crate::core::config::CardSettings;
use crate::core::errors::{log_recoverable, CardResult};
use crate::editing::glyph_controls::{self, RotateDirection};
use crate::editing::selection::{InteractionController, NudgeDirection};
use crate::export::Document;
use crate::font_source::{self, FontCache, FontLibrary, FontResource, GlyphOutline, LoadedFont};
use crate::geometry::{MaskGeometry, MaskGeometryCache};
use crate::io::image_loader::{self, Bitmap};
use crate::rendering::{render, CompositeInputs, RenderOptions};

/// An outline extraction that may run off the main thread
#[derive(Debug, Clone)]
pub struct OutlineJob {
    pub role: TextRole,
    pub key: OutlineKey,
    library: FontLibrary,
    font: Option<Arc<LoadedFont>>,
}

/// What an [`OutlineJob`] hands back
#[derive(Debug)]
pub struct OutlineResult {
    pub role: TextRole,
    pub key: OutlineKey,
    pub outline: CardResult<GlyphOutline>,
    /// Font parsed by the job, for the cache
    pub loaded_font: Option<LoadedFont>,
}

impl OutlineJob {
    pub fn run(self) -> OutlineResult {
        let mut loaded_font = None;
        let font = match self.font {
            Some(font) => Ok(font),
            None => self.library.load(&self.key.font).map(|font| {
                loaded_font = Some(font.clone());
                Arc::new(font)
            }),
        };
        let outline =
            font.and_then(|font| font_source::extract(&font, &self.key.text, self.key.size()));
        OutlineResult {
            role: self.role,
            key: self.key,
            outline,
            loaded_font,
        }
    }
}

fn recovered(context: &str, result: CardResult<bool>) -> bool {
    match result {
        Ok(changed) => changed,
        Err(error) => {
            log_recoverable(context, Err(error));
            false
        }
    }
}

#[derive(Resource, Debug)]
pub struct CardSession {
    settings: CardSettings,
    scene: Scene,
    fonts: FontCache,
    glyph_mask: MaskGeometryCache,
    message_mask: MaskGeometryCache,
    controller: InteractionController,
    dirty: bool,
}

impl Default for CardSession {
    fn default() -> Self {
        Self::from_settings(CardSettings::default())
    }
}

impl CardSession {
    /// Session whose fonts resolve inside `settings.font_dir`
    pub fn from_settings(settings: CardSettings) -> Self {
        let library = FontLibrary::new(settings.font_dir.clone());
        Self::new(settings, library)
    }

    pub fn new(settings: CardSettings, library: FontLibrary) -> Self {
        Self {
            scene: Scene::with_defaults(&settings),
            controller: InteractionController::new(&settings),
            fonts: FontCache::new(library),
            glyph_mask: MaskGeometryCache::default(),
            message_mask: MaskGeometryCache::default(),
            settings,
            dirty: true,
        }
    }

    pub fn settings(&self) -> &CardSettings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn glyph_mask(&self) -> Option<&MaskGeometry> {
        self.glyph_mask.geometry()
    }

    pub fn message_mask(&self) -> Option<&MaskGeometry> {
        self.message_mask.geometry()
    }

    fn mask_cache(&self, role: TextRole) -> &MaskGeometryCache {
        match role {
            TextRole::Glyph => &self.glyph_mask,
            TextRole::Message => &self.message_mask,
        }
    }

    fn mask_cache_mut(&mut self, role: TextRole) -> &mut MaskGeometryCache {
        match role {
            TextRole::Glyph => &mut self.glyph_mask,
            TextRole::Message => &mut self.message_mask,
        }
    }

    pub fn is_mask_pending(&self, role: TextRole) -> bool {
        self.mask_cache(role).is_pending()
    }

    /// Whether the view needs a new render
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn changed(&mut self, changed: bool) -> bool {
        self.dirty |= changed;
        changed
    }

    // Outlines

    /// Apply offset changes and start extraction for every text element
    /// whose outline inputs changed. Returns the jobs to run.
    pub fn outline_jobs(&mut self) -> Vec<OutlineJob> {
        let mut jobs = Vec::new();
        let texts = [
            (TextRole::Glyph, Some(self.scene.glyph.glyph_spec())),
            (
                TextRole::Message,
                self.scene.message.as_ref().map(|text| text.glyph_spec()),
            ),
        ];
        for (role, spec) in texts {
            let Some(spec) = spec else { continue };
            let font = self.fonts.get(&spec.font);
            let library = self.fonts.library().clone();
            let cache = self.mask_cache_mut(role);
            if cache.needs_extraction(&spec) {
                let key = spec.outline_key();
                cache.begin(key.clone());
                jobs.push(OutlineJob {
                    role,
                    key,
                    library,
                    font,
                });
            }
            let offset_changed = cache
                .geometry()
                .is_some_and(|geometry| geometry.offset() != spec.offset);
            cache.set_offset(spec.offset);
            self.dirty |= offset_changed;
        }
        jobs
    }

    /// Apply a finished extraction. Returns whether it was current.
    pub fn complete_outline(&mut self, result: OutlineResult) -> bool {
        if let Some(font) = result.loaded_font {
            self.fonts.insert(font);
        }
        let applied = self
            .mask_cache_mut(result.role)
            .complete(&result.key, result.outline);
        self.changed(applied)
    }

    /// Extract every outdated outline on the calling thread
    pub fn refresh_masks(&mut self) {
        for job in self.outline_jobs() {
            let result = job.run();
            self.complete_outline(result);
        }
    }

    // Images

    pub fn add_image(&mut self, bitmap: Bitmap) -> EntityId {
        let id = self.scene.add_image(Arc::new(bitmap), &self.settings);
        self.dirty = true;
        id
    }

    /// Decode and place an image file. Decode failures are returned so the
    /// caller can log and skip the file.
    pub fn add_image_from_path(&mut self, path: &Path) -> CardResult<EntityId> {
        let bitmap = image_loader::decode_file(path)?;
        info!("Placed image {}", path.display());
        Ok(self.add_image(bitmap))
    }

    pub fn select(&mut self, id: EntityId) -> bool {
        let selected = self.scene.select(id);
        self.changed(selected)
    }

    // Pointer interaction

    pub fn pointer_down(&mut self, point: Point) -> bool {
        let result = self.controller.pointer_down(&mut self.scene, point);
        let changed = recovered("pointer down", result);
        self.changed(changed)
    }

    pub fn pointer_move(&mut self, point: Point, axis_lock: bool) -> bool {
        let changed = recovered("pointer move", self.controller.pointer_move(point, axis_lock));
        self.changed(changed)
    }

    pub fn pointer_up(&mut self) -> bool {
        let result = self.controller.pointer_up(&mut self.scene);
        let changed = recovered("pointer up", result);
        self.changed(changed)
    }

    // Image commands

    pub fn nudge(&mut self, direction: NudgeDirection) -> bool {
        let result = self.controller.nudge(&mut self.scene, direction);
        let consumed = recovered("nudge", result);
        self.changed(consumed)
    }

    pub fn flip_selected(&mut self) -> bool {
        let result = self.controller.flip(&mut self.scene);
        let changed = recovered("flip", result);
        self.changed(changed)
    }

    pub fn reset_selected(&mut self) -> bool {
        let result = self.controller.reset(&mut self.scene);
        let changed = recovered("reset", result);
        self.changed(changed)
    }

    pub fn rotate_selected(&mut self, delta_deg: f64) -> bool {
        let result = self.controller.rotate(&mut self.scene, delta_deg);
        let changed = recovered("rotate", result);
        self.changed(changed)
    }

    pub fn delete_selected(&mut self) -> Option<EntityId> {
        let deleted = self.controller.delete_selected(&mut self.scene);
        self.changed(deleted.is_some());
        deleted
    }

    pub fn deselect(&mut self) -> bool {
        let changed = self.controller.deselect(&mut self.scene);
        self.changed(changed)
    }

    // Text controls

    fn edit_text(
        &mut self,
        role: TextRole,
        edit: impl FnOnce(&mut TextEntity, &CardSettings) -> bool,
    ) -> bool {
        let settings = &self.settings;
        let changed = match self.scene.text_mut(role) {
            Some(text) => edit(text, settings),
            None => false,
        };
        self.changed(changed)
    }

    pub fn move_text(&mut self, role: TextRole, direction: NudgeDirection) -> bool {
        self.edit_text(role, |text, settings| {
            glyph_controls::move_text(text, role, direction, &settings.text_controls);
            true
        })
    }

    pub fn rotate_text(&mut self, role: TextRole, direction: RotateDirection) -> bool {
        self.edit_text(role, |text, settings| {
            glyph_controls::rotate_text(text, direction, &settings.text_controls);
            true
        })
    }

    pub fn reset_glyph(&mut self) -> bool {
        self.edit_text(TextRole::Glyph, |text, settings| {
            glyph_controls::reset_glyph(text, settings.default_glyph_font.clone());
            true
        })
    }

    pub fn reset_message(&mut self) -> bool {
        self.edit_text(TextRole::Message, |text, _| {
            glyph_controls::reset_message(text);
            true
        })
    }

    pub fn set_glyph_content(&mut self, input: &str) -> bool {
        self.edit_text(TextRole::Glyph, |text, _| {
            glyph_controls::set_glyph_content(text, input)
        })
    }

    pub fn set_message_content(&mut self, input: &str) -> bool {
        self.edit_text(TextRole::Message, |text, _| {
            text.content = input.to_string();
            true
        })
    }

    pub fn set_size(&mut self, role: TextRole, input: &str) -> bool {
        self.edit_text(role, |text, _| glyph_controls::set_size(text, input))
    }

    pub fn set_font(&mut self, role: TextRole, font: FontResource) -> bool {
        debug!("{:?} font set to {}", role, font);
        self.edit_text(role, |text, _| {
            text.font = font;
            true
        })
    }

    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        self.edit_text(TextRole::Glyph, |text, settings| {
            glyph_controls::set_stroke_width(text, width, &settings.text_controls);
            true
        })
    }

    pub fn set_color(&mut self, role: TextRole, input: &str) -> bool {
        self.edit_text(role, |text, _| glyph_controls::set_color(text, input))
    }

    // Rendering and export

    /// Interactive render showing live nodes and selection chrome. Mounts
    /// nodes for every rendered image afterwards.
    pub fn render_view(&mut self) -> CardResult<Pixmap> {
        let pixmap = render(
            &CompositeInputs {
                scene: &self.scene,
                glyph: self.glyph_mask.geometry(),
                message: self.message_mask.geometry(),
                nodes: Some(self.controller.nodes()),
                settings: &self.settings,
            },
            RenderOptions::interactive(),
        )?;
        self.controller.sync_nodes(&self.scene);
        self.dirty = false;
        Ok(pixmap)
    }

    /// Supersampled render of the committed scene, without chrome
    pub fn render_snapshot(&self) -> CardResult<Pixmap> {
        render(
            &CompositeInputs {
                scene: &self.scene,
                glyph: self.glyph_mask.geometry(),
                message: self.message_mask.geometry(),
                nodes: None,
                settings: &self.settings,
            },
            RenderOptions::export(&self.settings),
        )
    }

    /// First half of an export: clear the selection so the next paint has
    /// no chrome. Returns whether a repaint is needed before the snapshot.
    pub fn prepare_export(&mut self) -> bool {
        self.deselect()
    }

    /// Second half of an export: rasterize and encode
    pub fn snapshot_document(&self) -> CardResult<Document> {
        let pixmap = self.render_snapshot()?;
        Document::from_snapshot(&pixmap, &self.settings.export)
    }

    /// Full export in one call: deselect, repaint once, rasterize, persist
    pub fn export(&mut self, path: &Path) -> CardResult<Document> {
        self.prepare_export();
        self.refresh_masks();
        self.render_view()?;
        let document = self.snapshot_document()?;
        document.persist(path)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::CardColor;

    fn session_with_image() -> (CardSession, EntityId) {
        let mut session = CardSession::default();
        session.refresh_masks();
        let id = session.add_image(Bitmap::solid(400, 200, CardColor::BLACK).unwrap());
        session.render_view().unwrap();
        (session, id)
    }

    #[test]
    fn test_offset_only_change_skips_extraction() {
        let mut session = CardSession::default();
        assert_eq!(session.outline_jobs().len(), 2);
        assert!(session.is_mask_pending(TextRole::Glyph));
        assert!(session.glyph_mask().is_none());

        // Nothing new requested while the first jobs are in flight
        assert!(session.outline_jobs().is_empty());

        session.move_text(TextRole::Glyph, NudgeDirection::Left);
        assert!(session.outline_jobs().is_empty());
    }

    #[test]
    fn test_async_results_apply_in_order() {
        let mut session = CardSession::default();
        let first = session.outline_jobs();
        session.set_glyph_content("7");
        let second = session.outline_jobs();
        assert_eq!(second.len(), 1);

        // The newer job finishes first; the older glyph result is stale
        for job in second {
            assert!(session.complete_outline(job.run()));
        }
        for job in first {
            let role = job.role;
            let applied = session.complete_outline(job.run());
            assert_eq!(applied, role == TextRole::Message);
        }
        assert!(session.glyph_mask().is_some());
        assert!(session.message_mask().is_some());
        assert!(!session.is_mask_pending(TextRole::Glyph));
    }

    #[test]
    fn test_click_then_nudge() {
        let (mut session, id) = session_with_image();
        assert!(session.pointer_down(Point::new(400.0, 400.0)));
        session.pointer_up();
        assert!(session.nudge(NudgeDirection::Right));
        assert_eq!(session.scene().image(id).unwrap().geometry.x, 301.0);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_stale_mutation_is_ignored() {
        let mut session = CardSession::default();
        let id = session.add_image(Bitmap::solid(10, 10, CardColor::BLACK).unwrap());
        session.select(id);
        // Never rendered, so no node is mounted
        assert!(!session.nudge(NudgeDirection::Right));
        assert_eq!(session.scene().image(id).unwrap().geometry.x, 300.0);
    }

    #[test]
    fn test_bad_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let mut session = CardSession::default();
        assert!(session.add_image_from_path(&path).is_err());
        assert_eq!(session.scene().image_count(), 0);
    }

    #[test]
    fn test_export_clears_selection_only() {
        let (mut session, id) = session_with_image();
        session.select(id);
        session.render_view().unwrap();
        let before = session.scene().image(id).unwrap().geometry;

        let dir = tempfile::tempdir().unwrap();
        let document = session.export(&dir.path().join("card.pdf")).unwrap();
        assert_eq!(document.pixel_width, 1600);
        assert_eq!(session.scene().selected_id(), None);
        assert_eq!(session.scene().image(id).unwrap().geometry, before);
    }
}
