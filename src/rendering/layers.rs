//! Paint order
//!
//! The composite is described as an ordered layer list before anything is
//! drawn. Background first, then the ghost silhouette, one isolated group
//! per image in scene order, the message, and the glyph outline, which is
//! always the top-most painted layer of the card itself. Selection chrome
//! is interactive-only and never part of an export.

use crate::core::state::{EntityId, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    /// Faint full glyph silhouette beneath the photos
    Silhouette,
    /// Glyph mask plus one image, composited source-in
    ImageGroup(EntityId),
    Message,
    /// Stroked glyph border
    Outline,
    SelectionChrome(EntityId),
}

/// What the layer builder needs to know beyond the scene
#[derive(Debug, Clone, Copy)]
pub struct LayerOptions {
    pub glyph_ready: bool,
    pub message_ready: bool,
    pub ghost_opacity: f32,
    pub interactive: bool,
}

/// Ordered layers for the current scene. Mask-dependent layers are left out
/// while the glyph geometry is not available.
pub fn build_layers(scene: &Scene, options: LayerOptions) -> Vec<Layer> {
    let mut layers = vec![Layer::Background];

    if options.glyph_ready {
        if options.ghost_opacity > 0.0 {
            layers.push(Layer::Silhouette);
        }
        layers.extend(scene.z_order().into_iter().map(Layer::ImageGroup));
    }

    if options.message_ready && scene.message.is_some() {
        layers.push(Layer::Message);
    }

    if options.glyph_ready && scene.glyph.stroke_width > 0.0 {
        layers.push(Layer::Outline);
    }

    if options.interactive {
        if let Some(id) = scene.selected_id() {
            layers.push(Layer::SelectionChrome(id));
        }
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CardSettings;
    use crate::core::state::CardColor;
    use crate::io::image_loader::Bitmap;
    use std::sync::Arc;

    fn options(interactive: bool) -> LayerOptions {
        LayerOptions {
            glyph_ready: true,
            message_ready: true,
            ghost_opacity: 0.1,
            interactive,
        }
    }

    fn scene_with_two() -> (Scene, EntityId, EntityId) {
        let settings = CardSettings::default();
        let mut scene = Scene::with_defaults(&settings);
        let a = scene.add_image(Arc::new(Bitmap::solid(2, 2, CardColor::BLACK).unwrap()), &settings);
        let b = scene.add_image(Arc::new(Bitmap::solid(2, 2, CardColor::BLACK).unwrap()), &settings);
        (scene, a, b)
    }

    #[test]
    fn test_full_order() {
        let (mut scene, a, b) = scene_with_two();
        scene.select(a);
        assert_eq!(
            build_layers(&scene, options(true)),
            vec![
                Layer::Background,
                Layer::Silhouette,
                Layer::ImageGroup(b),
                Layer::ImageGroup(a),
                Layer::Message,
                Layer::Outline,
                Layer::SelectionChrome(a),
            ]
        );
    }

    #[test]
    fn test_outline_tops_export_layers() {
        let (mut scene, a, _) = scene_with_two();
        scene.select(a);
        let layers = build_layers(&scene, options(false));
        assert_eq!(layers.last(), Some(&Layer::Outline));
        assert!(!layers.iter().any(|l| matches!(l, Layer::SelectionChrome(_))));
    }

    #[test]
    fn test_pending_mask_skips_dependent_layers() {
        let (scene, _, _) = scene_with_two();
        let layers = build_layers(
            &scene,
            LayerOptions {
                glyph_ready: false,
                ..options(false)
            },
        );
        assert_eq!(layers, vec![Layer::Background, Layer::Message]);
    }
}
