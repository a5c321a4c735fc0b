//! Geometry utility functions
//!
//! Small helpers shared by the drag, resize, and handle code.

use kurbo::{Point, Vec2};

/// Lock a position to horizontal or vertical axis relative to another point
/// (used when shift is held to constrain movement)
pub fn axis_lock_position(pos: Point, relative_to: Point) -> Point {
    let dxy = pos - relative_to;
    if dxy.x.abs() > dxy.y.abs() {
        Point::new(pos.x, relative_to.y)
    } else {
        Point::new(relative_to.x, pos.y)
    }
}

/// Same constraint applied to a displacement
pub fn axis_lock_delta(delta: Vec2) -> Vec2 {
    axis_lock_position(delta.to_point(), Point::ZERO).to_vec2()
}

/// Whether `delta` is long enough to count as a drag rather than a click
pub fn exceeds_threshold(delta: Vec2, threshold: f64) -> bool {
    delta.hypot() > threshold
}
