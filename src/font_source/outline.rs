//! Outline extraction
//!
//! Lays a string out left-to-right on the baseline using only the font's
//! native advance widths and collects every glyph contour into one
//! `BezPath` in canvas orientation (y grows downward, baseline at y = 0).

use kurbo::{BezPath, PathEl, Point, Rect, Shape};
use ttf_parser::{GlyphId, OutlineBuilder};

use super::library::LoadedFont;
use crate::core::errors::{CardError, CardResult};

/// Tight axis-aligned bounds of an outline, `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineBounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl OutlineBounds {
    pub fn from_rect(rect: Rect) -> Self {
        // kurbo rects can be built inverted; normalize to keep the ordering
        let rect = rect.abs();
        Self {
            x1: rect.x0,
            y1: rect.y0,
            x2: rect.x1,
            y2: rect.y1,
        }
    }

    pub fn midpoint(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// Filled outline of a laid-out string
#[derive(Debug, Clone)]
pub struct GlyphOutline {
    /// MoveTo / LineTo / CurveTo / ClosePath only
    pub path: BezPath,
    pub bounds: OutlineBounds,
    /// Pen position after the last glyph
    pub advance: f64,
}

/// Receives glyph contours from ttf-parser and maps them to canvas space
struct CanvasPen {
    path: BezPath,
    origin_x: f64,
    scale: f64,
    current: Point,
}

impl CanvasPen {
    fn new(scale: f64) -> Self {
        Self {
            path: BezPath::new(),
            origin_x: 0.0,
            scale,
            current: Point::ZERO,
        }
    }

    fn map(&self, x: f32, y: f32) -> Point {
        Point::new(
            self.origin_x + x as f64 * self.scale,
            -(y as f64) * self.scale,
        )
    }
}

impl OutlineBuilder for CanvasPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.move_to(p);
        self.current = p;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.line_to(p);
        self.current = p;
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        // Degree elevation, the path only carries cubics
        let control = self.map(x1, y1);
        let p = self.map(x, y);
        let c1 = self.current + (control - self.current) * (2.0 / 3.0);
        let c2 = p + (control - p) * (2.0 / 3.0);
        self.path.curve_to(c1, c2, p);
        self.current = p;
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.curve_to(self.map(x1, y1), self.map(x2, y2), p);
        self.current = p;
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Build the outline of `text` set at `size` starting at the origin.
pub fn extract(font: &LoadedFont, text: &str, size: f64) -> CardResult<GlyphOutline> {
    if text.is_empty() {
        return Err(CardError::path_generation(text, size, "text is empty"));
    }
    if !size.is_finite() || size <= 0.0 {
        return Err(CardError::path_generation(text, size, "size must be positive"));
    }

    let face = font.face()?;
    let scale = font.info.metrics.scale_for_size(size);
    let mut pen = CanvasPen::new(scale);

    for ch in text.chars() {
        let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
        // Blank glyphs such as spaces report no outline, only an advance
        let _ = face.outline_glyph(glyph, &mut pen);
        let advance = face.glyph_hor_advance(glyph).unwrap_or(0) as f64;
        pen.origin_x += advance * scale;
    }

    let has_segments = pen
        .path
        .elements()
        .iter()
        .any(|el| !matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath));
    if !has_segments {
        return Err(CardError::path_generation(
            text,
            size,
            "font produced no outline for this text",
        ));
    }

    let bounds = OutlineBounds::from_rect(pen.path.bounding_box());
    Ok(GlyphOutline {
        path: pen.path,
        bounds,
        advance: pen.origin_x,
    })
}
