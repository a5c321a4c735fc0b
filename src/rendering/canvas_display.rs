//! Shows the composite in the window
//!
//! The card is rasterized on the CPU and uploaded into a Bevy `Image` that a
//! single sprite displays at 1:1. The canvas sprite sits at the world origin,
//! so world space and canvas space differ only by a shift and a y flip.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use tiny_skia::Pixmap;

use crate::core::state::CardSession;
use crate::systems::CardSets;

/// Marker for the sprite that shows the card
#[derive(Component)]
pub struct CanvasSprite;

/// Handle of the image the card is drawn into
#[derive(Resource)]
pub struct CanvasImage(pub Handle<Image>);

pub struct CanvasDisplayPlugin;

impl Plugin for CanvasDisplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_canvas)
            .add_systems(Update, redraw_canvas.in_set(CardSets::Render));
    }
}

/// Window-centered world position → canvas units (y down)
pub fn world_to_canvas(world: Vec2, canvas_size: f64) -> kurbo::Point {
    let half = canvas_size / 2.0;
    kurbo::Point::new(world.x as f64 + half, half - world.y as f64)
}

/// Straight-alpha RGBA bytes for upload
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    data
}

fn blank_image(size: u32) -> Image {
    Image::new_fill(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[255, 255, 255, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

fn spawn_canvas(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut session: ResMut<CardSession>,
) {
    let size = session.settings().render.canvas_size;
    let handle = images.add(blank_image(size as u32));

    commands.spawn(Camera2d);
    commands.spawn((
        Sprite {
            image: handle.clone(),
            custom_size: Some(Vec2::splat(size)),
            ..default()
        },
        Transform::default(),
        CanvasSprite,
    ));
    commands.insert_resource(CanvasImage(handle));
    session.mark_dirty();
    debug!("Spawned {}x{} canvas", size, size);
}

/// Re-rasterize the card when the session changed since the last paint
fn redraw_canvas(
    mut session: ResMut<CardSession>,
    canvas: Option<Res<CanvasImage>>,
    mut images: ResMut<Assets<Image>>,
) {
    if !session.is_dirty() {
        return;
    }
    let Some(canvas) = canvas else {
        return;
    };
    let pixmap = match session.render_view() {
        Ok(pixmap) => pixmap,
        Err(error) => {
            error!("Canvas render failed: {}", error);
            return;
        }
    };
    let Some(image) = images.get_mut(&canvas.0) else {
        warn!("Canvas image asset is missing");
        return;
    };
    let (width, height) = (pixmap.width(), pixmap.height());
    if image.width() != width || image.height() != height {
        *image = blank_image(width);
    }
    image.data = Some(pixmap_to_rgba(&pixmap));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_origin_is_canvas_center() {
        assert_eq!(world_to_canvas(Vec2::ZERO, 800.0), kurbo::Point::new(400.0, 400.0));
        // World y grows upward, canvas y grows downward
        assert_eq!(
            world_to_canvas(Vec2::new(-400.0, 400.0), 800.0),
            kurbo::Point::new(0.0, 0.0)
        );
        assert_eq!(
            world_to_canvas(Vec2::new(100.0, -50.0), 800.0),
            kurbo::Point::new(500.0, 450.0)
        );
    }

    #[test]
    fn test_upload_bytes_are_straight_alpha() {
        let mut pixmap = Pixmap::new(2, 1).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(200, 100, 50, 128));
        let data = pixmap_to_rgba(&pixmap);
        assert_eq!(data.len(), 8);
        assert_eq!(data[3], 128);
        // Demultiplying rounds, so allow a step of error
        assert!((data[0] as i32 - 200).abs() <= 2);
        assert!((data[1] as i32 - 100).abs() <= 2);
    }
}
