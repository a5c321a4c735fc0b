//! Placed photos
//!
//! An image entity's box is axis-aligned in its own local frame: local
//! `(0, 0)` is the visual top-left corner, `(width, height)` the bottom-right,
//! and the frame is rotated clockwise by `rotation_deg` around that corner.
//!
//! Flip is a horizontal scale of -1. A flipped image mirrors around its own
//! vertical center line and its anchor `x` sits half a width to the right of
//! the visual left edge, so toggling flip together with the half-width shift
//! of `x` leaves the visual box in place.

use kurbo::{Affine, Point, Rect, Vec2};
use std::fmt;
use std::sync::Arc;

use crate::io::image_loader::Bitmap;

/// Session-unique image id; allocated monotonically and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position, size, and orientation of an image box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// +1 or -1
    pub scale_x: f64,
    pub rotation_deg: f64,
}

impl ImageGeometry {
    /// Unrotated, unflipped box with its top-left at `(x, y)`
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            scale_x: 1.0,
            rotation_deg: 0.0,
        }
    }

    /// Box of `width` with the bitmap's aspect ratio, centered on `center`
    pub fn centered(center: Point, width: f64, aspect_ratio: f64) -> Self {
        let height = width * aspect_ratio;
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn is_flipped(&self) -> bool {
        self.scale_x < 0.0
    }

    /// Horizontal offset between the anchor `x` and the visual left edge
    pub fn flip_shift(&self) -> f64 {
        if self.is_flipped() {
            self.width / 2.0
        } else {
            0.0
        }
    }

    /// Visual top-left corner, the pivot of rotation
    pub fn visual_origin(&self) -> Point {
        Point::new(self.x - self.flip_shift(), self.y)
    }

    /// Move the box so its visual top-left lands on `origin`
    pub fn set_visual_origin(&mut self, origin: Point) {
        self.x = origin.x + self.flip_shift();
        self.y = origin.y;
    }

    /// Local box frame → canvas
    pub fn transform(&self) -> Affine {
        Affine::translate(self.visual_origin().to_vec2())
            * Affine::rotate(self.rotation_deg.to_radians())
    }

    /// Canvas point → local box frame
    pub fn to_local(&self, point: Point) -> Point {
        self.transform().inverse() * point
    }

    /// Canvas vector → local box frame (rotation only)
    pub fn vector_to_local(&self, vector: Vec2) -> Vec2 {
        Affine::rotate(-self.rotation_deg.to_radians()) * vector.to_point() - Point::ZERO
    }

    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Hit test against the rotated box
    pub fn contains(&self, point: Point) -> bool {
        let local = self.to_local(point);
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }

    /// Visual center on the canvas
    pub fn center(&self) -> Point {
        self.transform() * Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Add `delta_deg` to the rotation, keeping the visual center in place
    pub fn rotate_about_center(&mut self, delta_deg: f64) {
        let center = self.center();
        self.rotation_deg += delta_deg;
        let half = Affine::rotate(self.rotation_deg.to_radians())
            * Point::new(self.width / 2.0, self.height / 2.0);
        self.set_visual_origin(center - half.to_vec2());
    }

    /// Bitmap pixel space → canvas, including the mirror for flipped boxes
    pub fn bitmap_transform(&self, natural_width: f64, natural_height: f64) -> Affine {
        let fit = Affine::scale_non_uniform(
            self.width / natural_width.max(1.0),
            self.height / natural_height.max(1.0),
        );
        let mirror = if self.is_flipped() {
            Affine::translate((self.width, 0.0)) * Affine::scale_non_uniform(-1.0, 1.0)
        } else {
            Affine::IDENTITY
        };
        self.transform() * mirror * fit
    }
}

/// A placed photo
#[derive(Debug, Clone)]
pub struct ImageEntity {
    pub id: EntityId,
    pub source: Arc<Bitmap>,
    pub geometry: ImageGeometry,
    pub selected: bool,
    pub flipped: bool,
}

impl ImageEntity {
    pub fn new(id: EntityId, source: Arc<Bitmap>, geometry: ImageGeometry) -> Self {
        Self {
            id,
            source,
            flipped: geometry.is_flipped(),
            geometry,
            selected: false,
        }
    }

    /// Replace the geometry, keeping `flipped` in step with `scale_x`
    pub fn set_geometry(&mut self, geometry: ImageGeometry) {
        self.geometry = geometry;
        self.flipped = geometry.is_flipped();
    }

    /// `flipped` agrees with the sign of `scale_x`
    pub fn is_consistent(&self) -> bool {
        self.flipped == self.geometry.is_flipped()
    }

    pub fn bitmap_transform(&self) -> Affine {
        self.geometry.bitmap_transform(
            self.source.natural_width() as f64,
            self.source.natural_height() as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn test_centered_keeps_aspect() {
        let geometry = ImageGeometry::centered(Point::new(400.0, 400.0), 200.0, 0.5);
        assert_eq!(geometry.width, 200.0);
        assert_eq!(geometry.height, 100.0);
        assert_eq!(geometry.x, 300.0);
        assert_eq!(geometry.y, 350.0);
        assert!(approx(geometry.center(), Point::new(400.0, 400.0)));
    }

    #[test]
    fn test_flipped_box_mirrors_in_place() {
        let mut geometry = ImageGeometry::new(100.0, 50.0, 200.0, 100.0);
        let before = geometry.center();
        geometry.scale_x = -1.0;
        geometry.x += geometry.width / 2.0;
        assert!(approx(geometry.center(), before));
        assert!(approx(geometry.visual_origin(), Point::new(100.0, 50.0)));

        // Bitmap left edge now maps to the visual right edge
        let t = geometry.bitmap_transform(400.0, 200.0);
        assert!(approx(t * Point::new(0.0, 0.0), Point::new(300.0, 50.0)));
        assert!(approx(t * Point::new(400.0, 200.0), Point::new(100.0, 150.0)));
    }

    #[test]
    fn test_rotated_hit_test() {
        let mut geometry = ImageGeometry::new(0.0, 0.0, 100.0, 10.0);
        assert!(geometry.contains(Point::new(90.0, 5.0)));
        geometry.rotation_deg = 90.0;
        // Rotated clockwise around the top-left: the box now hangs downward
        assert!(!geometry.contains(Point::new(90.0, 5.0)));
        assert!(geometry.contains(Point::new(-5.0, 90.0)));
    }

    #[test]
    fn test_rotate_keeps_center() {
        let mut geometry = ImageGeometry::new(300.0, 350.0, 200.0, 100.0);
        geometry.rotate_about_center(30.0);
        assert_eq!(geometry.rotation_deg, 30.0);
        assert!(approx(geometry.center(), Point::new(400.0, 400.0)));
        geometry.rotate_about_center(-30.0);
        assert!((geometry.x - 300.0).abs() < 1e-9);
        assert!((geometry.y - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_geometry_tracks_flip() {
        let bitmap = Arc::new(Bitmap::solid(4, 2, crate::core::state::CardColor::BLACK).unwrap());
        let mut entity = ImageEntity::new(EntityId(1), bitmap, ImageGeometry::new(0.0, 0.0, 4.0, 2.0));
        assert!(!entity.flipped);
        let mut geometry = entity.geometry;
        geometry.scale_x = -1.0;
        entity.set_geometry(geometry);
        assert!(entity.flipped);
        assert!(entity.is_consistent());
    }
}
