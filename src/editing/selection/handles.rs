//! Resize handles
//!
//! Eight handles sit on the corners and edge midpoints of an image box.
//! Hit testing happens in the box's local frame, so rotated boxes work the
//! same as upright ones.

use kurbo::{Point, Rect};

use crate::core::state::ImageGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl HandleKind {
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::Top,
        HandleKind::TopRight,
        HandleKind::Right,
        HandleKind::BottomRight,
        HandleKind::Bottom,
        HandleKind::BottomLeft,
        HandleKind::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft
                | HandleKind::TopRight
                | HandleKind::BottomRight
                | HandleKind::BottomLeft
        )
    }

    /// Whether dragging this handle moves the left edge
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft | HandleKind::Left | HandleKind::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            HandleKind::TopRight | HandleKind::Right | HandleKind::BottomRight
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft | HandleKind::Top | HandleKind::TopRight
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            HandleKind::BottomLeft | HandleKind::Bottom | HandleKind::BottomRight
        )
    }

    /// Handle position in the box's local frame
    pub fn local_anchor(self, width: f64, height: f64) -> Point {
        let x = if self.moves_left() {
            0.0
        } else if self.moves_right() {
            width
        } else {
            width / 2.0
        };
        let y = if self.moves_top() {
            0.0
        } else if self.moves_bottom() {
            height
        } else {
            height / 2.0
        };
        Point::new(x, y)
    }
}

/// Square hit area of each handle in the local frame
pub fn handle_rects(geometry: &ImageGeometry, handle_size: f64) -> Vec<(HandleKind, Rect)> {
    let half = handle_size / 2.0;
    HandleKind::ALL
        .iter()
        .map(|&kind| {
            let anchor = kind.local_anchor(geometry.width, geometry.height);
            (
                kind,
                Rect::new(anchor.x - half, anchor.y - half, anchor.x + half, anchor.y + half),
            )
        })
        .collect()
}

/// Handle under a canvas point, corners first
pub fn hit_handle(geometry: &ImageGeometry, point: Point, handle_size: f64) -> Option<HandleKind> {
    let local = geometry.to_local(point);
    let rects = handle_rects(geometry, handle_size);
    rects
        .iter()
        .filter(|(kind, _)| kind.is_corner())
        .chain(rects.iter().filter(|(kind, _)| !kind.is_corner()))
        .find(|(_, rect)| rect.contains(local))
        .map(|(kind, _)| *kind)
}
