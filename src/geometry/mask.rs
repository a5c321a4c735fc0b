//! Mask geometry and its cache
//!
//! The glyph outline is extracted in font layout space (origin on the
//! baseline). `MaskGeometry` adds the manual offset and knows how to place
//! the path so the glyph sits in the middle of the canvas. The cache keeps
//! extraction off the render path: an outline is rebuilt only when text,
//! font, or size change, and an offset change only moves the center.

use kurbo::{Affine, BezPath, Point, Vec2};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::errors::CardResult;
use crate::core::state::{GlyphSpec, Loadable, OutlineKey};
use crate::font_source::{self, FontCache, GlyphOutline, OutlineBounds};

/// Outline plus the center used to position it on the canvas
#[derive(Debug, Clone)]
pub struct MaskGeometry {
    outline: Arc<GlyphOutline>,
    offset: Vec2,
    /// `midpoint(bounds) + offset`, same space as the path
    pub center: Point,
}

impl MaskGeometry {
    pub fn new(outline: Arc<GlyphOutline>, offset: Vec2) -> Self {
        let center = outline.bounds.midpoint() + offset;
        Self {
            outline,
            offset,
            center,
        }
    }

    pub fn path(&self) -> &BezPath {
        &self.outline.path
    }

    pub fn bounds(&self) -> OutlineBounds {
        self.outline.bounds
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Translation that puts `center` on the canvas center
    pub fn placement(&self, canvas_size: f64) -> Vec2 {
        Vec2::new(
            canvas_size / 2.0 - self.center.x,
            canvas_size / 2.0 - self.center.y,
        )
    }

    /// Path space → canvas for the glyph: rotate around the outline's own
    /// midpoint, then translate into place
    pub fn glyph_transform(&self, canvas_size: f64, rotation_deg: f64) -> Affine {
        Affine::translate(self.placement(canvas_size))
            * Affine::rotate_about(rotation_deg.to_radians(), self.bounds().midpoint())
    }

    /// Path space → canvas for an overlay text run: the run's midpoint lands
    /// on `canvas center + offset` and it rotates around that point
    pub fn overlay_transform(&self, canvas_size: f64, rotation_deg: f64) -> Affine {
        let mid = self.bounds().midpoint();
        let target = Point::new(canvas_size / 2.0, canvas_size / 2.0) + self.offset;
        Affine::translate(target - mid) * Affine::rotate_about(rotation_deg.to_radians(), mid)
    }
}

/// Cached outline for one text element with pending/ready/failed tracking
#[derive(Debug, Default)]
pub struct MaskGeometryCache {
    requested: Option<OutlineKey>,
    state: Loadable<Arc<GlyphOutline>>,
    last_good: Option<Arc<GlyphOutline>>,
    offset: Vec2,
    geometry: Option<MaskGeometry>,
    extractions: usize,
}

impl MaskGeometryCache {
    /// Whether `spec` asks for an outline other than the one requested last
    pub fn needs_extraction(&self, spec: &GlyphSpec) -> bool {
        self.requested.as_ref() != Some(&spec.outline_key())
    }

    /// Mark a new extraction as in flight. The last good geometry stays
    /// available until it completes.
    pub fn begin(&mut self, key: OutlineKey) {
        debug!("Outline requested for '{}' at {}", key.text, key.size());
        self.requested = Some(key);
        self.state = Loadable::Pending;
    }

    /// Apply an extraction result. Results for a superseded request are
    /// discarded; returns whether the result was applied.
    pub fn complete(&mut self, key: &OutlineKey, result: CardResult<GlyphOutline>) -> bool {
        if self.requested.as_ref() != Some(key) {
            debug!("Discarding outline for superseded request '{}'", key.text);
            return false;
        }
        self.extractions += 1;
        match result {
            Ok(outline) => {
                let outline = Arc::new(outline);
                self.last_good = Some(outline.clone());
                self.state = Loadable::Ready(outline);
                self.rebuild_geometry();
            }
            Err(error) => {
                warn!("Keeping previous mask: {}", error);
                self.state = Loadable::Failed(error.to_string());
            }
        }
        true
    }

    /// Update the manual offset; cheap, never re-extracts
    pub fn set_offset(&mut self, offset: Vec2) {
        if self.offset != offset {
            self.offset = offset;
            self.rebuild_geometry();
        }
    }

    /// Bring the cache in line with `spec`, extracting synchronously when
    /// the outline inputs changed. Returns whether the geometry changed.
    pub fn refresh(&mut self, spec: &GlyphSpec, fonts: &mut FontCache) -> bool {
        let before = self.geometry.as_ref().map(|g| (Arc::as_ptr(&g.outline), g.center));
        if self.needs_extraction(spec) {
            let key = spec.outline_key();
            self.begin(key.clone());
            let result = fonts
                .get_or_load(&spec.font)
                .and_then(|font| font_source::extract(&font, &spec.content, spec.size));
            self.complete(&key, result);
        }
        self.set_offset(spec.offset);
        let after = self.geometry.as_ref().map(|g| (Arc::as_ptr(&g.outline), g.center));
        before != after
    }

    fn rebuild_geometry(&mut self) {
        self.geometry = self
            .last_good
            .clone()
            .map(|outline| MaskGeometry::new(outline, self.offset));
    }

    /// Current geometry, possibly stale while a newer request is pending or
    /// after it failed. `None` only before the first success.
    pub fn geometry(&self) -> Option<&MaskGeometry> {
        self.geometry.as_ref()
    }

    pub fn state(&self) -> &Loadable<Arc<GlyphOutline>> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.requested.is_some() && self.state.is_pending()
    }

    /// Number of extraction results applied so far
    pub fn extraction_count(&self) -> usize {
        self.extractions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::CardError;
    use crate::core::state::TextEntity;
    use crate::font_source::{FontLibrary, FontResource};

    fn glyph_spec() -> GlyphSpec {
        TextEntity::glyph_default(FontResource::Builtin).glyph_spec()
    }

    #[test]
    fn test_center_is_midpoint_plus_offset() {
        let mut cache = MaskGeometryCache::default();
        let mut fonts = FontCache::default();
        let spec = glyph_spec();
        assert!(cache.refresh(&spec, &mut fonts));

        let geometry = cache.geometry().unwrap();
        let mid = geometry.bounds().midpoint();
        assert_eq!(geometry.center, mid + Vec2::new(0.0, -30.0));

        // The glyph midpoint ends up at canvas center minus the offset
        let on_canvas = geometry.glyph_transform(800.0, 0.0) * mid;
        assert!((on_canvas - Point::new(400.0, 430.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_offset_change_does_not_re_extract() {
        let mut cache = MaskGeometryCache::default();
        let mut fonts = FontCache::default();
        let mut spec = glyph_spec();
        cache.refresh(&spec, &mut fonts);
        assert_eq!(cache.extraction_count(), 1);

        spec.offset = Vec2::new(10.0, 0.0);
        spec.rotation_deg = 45.0;
        assert!(cache.refresh(&spec, &mut fonts));
        assert_eq!(cache.extraction_count(), 1);

        // Same inputs: nothing to do
        assert!(!cache.refresh(&spec, &mut fonts));

        spec.content = "21".into();
        cache.refresh(&spec, &mut fonts);
        assert_eq!(cache.extraction_count(), 2);
    }

    #[test]
    fn test_failure_keeps_last_good_mask() {
        let mut cache = MaskGeometryCache::default();
        let mut fonts = FontCache::new(FontLibrary::new("/missing"));
        let mut spec = glyph_spec();
        cache.refresh(&spec, &mut fonts);
        let good_center = cache.geometry().unwrap().center;

        spec.font = FontResource::Family("Coiny".into());
        cache.refresh(&spec, &mut fonts);
        assert!(cache.state().is_failed());
        assert_eq!(cache.geometry().unwrap().center, good_center);

        spec.content = String::new();
        spec.font = FontResource::Builtin;
        cache.refresh(&spec, &mut fonts);
        assert!(cache.state().is_failed());
        assert!(cache.geometry().is_some());
    }

    #[test]
    fn test_superseded_completion_is_discarded() {
        let mut cache = MaskGeometryCache::default();
        let first = glyph_spec().outline_key();
        let mut newer_spec = glyph_spec();
        newer_spec.content = "99".into();
        let second = newer_spec.outline_key();

        cache.begin(first.clone());
        cache.begin(second.clone());
        assert!(cache.is_pending());
        assert!(!cache.complete(&first, Err(CardError::Export("late".into()))));
        assert!(cache.is_pending());
        assert!(cache.geometry().is_none());

        let font = FontLibrary::default().load(&FontResource::Builtin).unwrap();
        let outline = font_source::extract(&font, "99", 550.0);
        assert!(cache.complete(&second, outline));
        assert!(cache.state().is_ready());
        assert!(cache.geometry().is_some());
    }

    #[test]
    fn test_overlay_transform_centers_run() {
        let font = FontLibrary::default().load(&FontResource::Builtin).unwrap();
        let outline = Arc::new(font_source::extract(&font, "Hi", 90.0).unwrap());
        let geometry = MaskGeometry::new(outline, Vec2::new(0.0, 80.0));
        let mid = geometry.bounds().midpoint();
        let placed = geometry.overlay_transform(800.0, 30.0) * mid;
        assert!((placed - Point::new(400.0, 480.0)).hypot() < 1e-9);
    }
}
