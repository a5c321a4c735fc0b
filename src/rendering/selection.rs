//! Selection chrome
//!
//! Bounding box and the eight resize handles of the selected image, drawn
//! in the image's rotated frame on top of everything else. Interactive
//! renders only.

use kurbo::{Affine, Shape};
use tiny_skia::{Paint, Pixmap, Stroke};

use super::path_conversion::{to_skia_path, to_skia_transform};
use crate::core::config::CardSettings;
use crate::core::state::{CardColor, ImageGeometry};
use crate::editing::selection::handle_rects;

const BOX_LINE_WIDTH: f32 = 1.5;
const HANDLE_LINE_WIDTH: f32 = 1.0;

fn paint(color: CardColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

/// Draw the box and handles for `geometry`. `base` maps canvas units to
/// pixmap pixels.
pub fn draw_selection_chrome(
    pixmap: &mut Pixmap,
    geometry: &ImageGeometry,
    base: Affine,
    settings: &CardSettings,
) {
    let transform = to_skia_transform(base * geometry.transform());
    let accent = paint(settings.render.selection_color);

    if let Some(outline) = to_skia_path(&geometry.local_rect().to_path(0.1)) {
        let stroke = Stroke {
            width: BOX_LINE_WIDTH,
            ..Stroke::default()
        };
        pixmap.stroke_path(&outline, &accent, &stroke, transform, None);
    }

    let fill = paint(CardColor::WHITE);
    let stroke = Stroke {
        width: HANDLE_LINE_WIDTH,
        ..Stroke::default()
    };
    for (_, rect) in handle_rects(geometry, settings.interaction.handle_size) {
        if let Some(handle) = to_skia_path(&rect.to_path(0.1)) {
            pixmap.fill_path(&handle, &fill, tiny_skia::FillRule::Winding, transform, None);
            pixmap.stroke_path(&handle, &accent, &stroke, transform, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_draws_accent_on_box_edge() {
        let settings = CardSettings::default();
        let mut pixmap = Pixmap::new(100, 100).unwrap();
        let geometry = ImageGeometry::new(20.0, 20.0, 60.0, 40.0);
        draw_selection_chrome(&mut pixmap, &geometry, Affine::IDENTITY, &settings);

        // Middle of the top edge, between handles
        let edge = pixmap.pixel(35, 20).unwrap();
        assert!(edge.alpha() > 0);
        assert!(edge.blue() > edge.red());
        // Box interior stays untouched
        assert_eq!(pixmap.pixel(50, 40).unwrap().alpha(), 0);
    }
}
