//! Embedded assets for glyphcard
//!
//! The default font is compiled into the binary so the card renders a glyph
//! even when no font directory is configured (e.g., after cargo install).

// Embed the font file at compile time
pub const DEFAULT_FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Name reported for the embedded font in logs and errors
pub const DEFAULT_FONT_NAME: &str = "DejaVu Sans Bold (embedded)";

/// Look up an embedded font by file name.
///
/// Lets a font directory reference `DejaVuSans-Bold.ttf` and still work when
/// the assets directory is missing.
pub fn embedded_font(file_name: &str) -> Option<&'static [u8]> {
    match file_name {
        "DejaVuSans-Bold.ttf" | "dejavu-sans-bold.ttf" => Some(DEFAULT_FONT_BYTES),
        _ => None,
    }
}
