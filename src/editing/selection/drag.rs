//! Drag and resize math
//!
//! Pure functions from an interaction's starting geometry plus the pointer
//! displacement to the proposed live geometry. They never touch the scene.

use kurbo::{Point, Vec2};

use super::handles::HandleKind;
use crate::core::state::ImageGeometry;
use crate::geometry::axis_lock_delta;

/// Geometry after moving the box by `delta` canvas units
pub fn drag_geometry(origin: &ImageGeometry, delta: Vec2, axis_lock: bool) -> ImageGeometry {
    let delta = if axis_lock { axis_lock_delta(delta) } else { delta };
    let mut geometry = *origin;
    geometry.x += delta.x;
    geometry.y += delta.y;
    geometry
}

/// Geometry after dragging `handle` by `delta` canvas units, or `None` when
/// the proposed box is narrower or shorter than `min_size`.
///
/// Edges are moved in the box's local frame, so rotation is preserved.
/// Corner handles keep the aspect ratio and pin the opposite corner; edge
/// handles change one dimension and pin the opposite edge.
pub fn resize_geometry(
    origin: &ImageGeometry,
    handle: HandleKind,
    delta: Vec2,
    min_size: f64,
) -> Option<ImageGeometry> {
    let local = origin.vector_to_local(delta);
    let (width, height) = (origin.width, origin.height);

    let mut new_width = width;
    let mut new_height = height;
    if handle.moves_left() {
        new_width -= local.x;
    } else if handle.moves_right() {
        new_width += local.x;
    }
    if handle.moves_top() {
        new_height -= local.y;
    } else if handle.moves_bottom() {
        new_height += local.y;
    }

    if handle.is_corner() && width > 0.0 && height > 0.0 {
        let sx = new_width / width;
        let sy = new_height / height;
        let scale = if (sx - 1.0).abs() >= (sy - 1.0).abs() {
            sx
        } else {
            sy
        };
        new_width = width * scale;
        new_height = height * scale;
    }

    if !(new_width >= min_size && new_height >= min_size) {
        return None;
    }

    // New top-left in the old local frame; the opposite side stays pinned
    let left = if handle.moves_left() {
        width - new_width
    } else {
        0.0
    };
    let top = if handle.moves_top() {
        height - new_height
    } else {
        0.0
    };
    let origin_on_canvas = origin.transform() * Point::new(left, top);

    let mut geometry = *origin;
    geometry.width = new_width;
    geometry.height = new_height;
    geometry.set_visual_origin(origin_on_canvas);
    Some(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn base() -> ImageGeometry {
        ImageGeometry::new(300.0, 350.0, 200.0, 100.0)
    }

    #[test]
    fn test_drag_with_axis_lock() {
        let moved = drag_geometry(&base(), Vec2::new(12.0, 5.0), true);
        assert_eq!((moved.x, moved.y), (312.0, 350.0));
        let free = drag_geometry(&base(), Vec2::new(12.0, 5.0), false);
        assert_eq!((free.x, free.y), (312.0, 355.0));
        assert_eq!(free.width, 200.0);
    }

    #[test]
    fn test_edge_resize_pins_opposite_edge() {
        let resized = resize_geometry(&base(), HandleKind::Left, Vec2::new(50.0, 9.0), 20.0).unwrap();
        assert!(approx(resized.width, 150.0));
        assert!(approx(resized.height, 100.0));
        assert!(approx(resized.x, 350.0));
        assert!(approx(resized.x + resized.width, 500.0));
    }

    #[test]
    fn test_corner_resize_keeps_aspect() {
        let resized =
            resize_geometry(&base(), HandleKind::BottomRight, Vec2::new(100.0, 10.0), 20.0)
                .unwrap();
        assert!(approx(resized.width, 300.0));
        assert!(approx(resized.height, 150.0));
        assert!(approx(resized.x, 300.0));
        assert!(approx(resized.y, 350.0));

        let from_top_left =
            resize_geometry(&base(), HandleKind::TopLeft, Vec2::new(100.0, 0.0), 20.0).unwrap();
        assert!(approx(from_top_left.width, 100.0));
        assert!(approx(from_top_left.height, 50.0));
        // Bottom-right corner did not move
        assert!(approx(from_top_left.x + from_top_left.width, 500.0));
        assert!(approx(from_top_left.y + from_top_left.height, 450.0));
    }

    #[test]
    fn test_resize_below_floor_is_rejected() {
        assert!(resize_geometry(&base(), HandleKind::Right, Vec2::new(-185.0, 0.0), 20.0).is_none());
        assert!(resize_geometry(&base(), HandleKind::Bottom, Vec2::new(0.0, -200.0), 20.0).is_none());
        assert!(resize_geometry(&base(), HandleKind::Right, Vec2::new(-180.0, 0.0), 20.0).is_some());
    }

    #[test]
    fn test_resize_rotated_box_uses_local_frame() {
        let mut rotated = base();
        rotated.rotation_deg = 90.0;
        // Local +x points down the canvas after a quarter turn
        let resized =
            resize_geometry(&rotated, HandleKind::Right, Vec2::new(0.0, 40.0), 20.0).unwrap();
        assert!(approx(resized.width, 240.0));
        assert!(approx(resized.x, 300.0));
        assert!(approx(resized.y, 350.0));
    }

    #[test]
    fn test_resize_flipped_box_keeps_anchor_consistent() {
        let mut flipped = base();
        flipped.scale_x = -1.0;
        flipped.x += flipped.width / 2.0;
        let resized =
            resize_geometry(&flipped, HandleKind::Right, Vec2::new(-100.0, 0.0), 20.0).unwrap();
        assert!(approx(resized.width, 100.0));
        // Visual left edge stays at 300, anchor is half the new width to its right
        assert!(approx(resized.visual_origin().x, 300.0));
        assert!(approx(resized.x, 350.0));
    }
}
