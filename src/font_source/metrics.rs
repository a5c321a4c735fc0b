//! Font metrics and naming
//!
//! Just enough metadata from a parsed face to scale outlines and to log
//! which font actually got loaded.

use ttf_parser::{name_id, Face};

/// Font information
#[derive(Clone, Debug, Default)]
pub struct FontInfo {
    pub family_name: String,
    pub style_name: String,
    pub metrics: FontMetrics,
}

/// Font metrics in font units
#[derive(Clone, Copy, Debug, Default)]
pub struct FontMetrics {
    pub units_per_em: f64,
    pub ascender: f64,
    pub descender: f64,
    pub line_gap: f64,
}

impl FontInfo {
    /// Extract font info from a parsed face
    pub fn from_face(face: &Face<'_>) -> Self {
        Self {
            family_name: Self::extract_name(face, name_id::FAMILY, "Untitled"),
            style_name: Self::extract_name(face, name_id::SUBFAMILY, "Regular"),
            metrics: FontMetrics::from_face(face),
        }
    }

    /// Helper to extract a unicode name record with a default
    fn extract_name(face: &Face<'_>, id: u16, default: &str) -> String {
        face.names()
            .into_iter()
            .filter(|name| name.name_id == id && name.is_unicode())
            .find_map(|name| name.to_string())
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a display name combining family and style names
    pub fn get_display_name(&self) -> String {
        let parts: Vec<&str> = [&self.family_name, &self.style_name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect();

        if parts.is_empty() {
            "Untitled Font".to_string()
        } else {
            parts.join(" ")
        }
    }
}

impl FontMetrics {
    pub fn from_face(face: &Face<'_>) -> Self {
        Self {
            units_per_em: face.units_per_em() as f64,
            ascender: face.ascender() as f64,
            descender: face.descender() as f64,
            line_gap: face.line_gap() as f64,
        }
    }

    /// Factor converting font units to canvas units at `size`
    pub fn scale_for_size(&self, size: f64) -> f64 {
        if self.units_per_em > 0.0 {
            size / self.units_per_em
        } else {
            0.0
        }
    }
}
