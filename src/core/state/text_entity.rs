//! Text elements of the card
//!
//! The card carries two text elements with the same shape: the big number
//! whose outline becomes the photo mask, and an optional free-form message
//! drawn as a plain overlay.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::font_source::FontResource;

/// Which layer consumes a text element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// Mask source and stroked outline
    Glyph,
    /// Filled overlay above the photos
    Message,
}

/// sRGB color with alpha, serialized as `#rrggbb` or `#rrggbbaa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl CardColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa` (leading `#` optional)
    pub fn from_hex(input: &str) -> Option<Self> {
        let hex = input.trim().trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::rgb(digits.next()??, digits.next()??, digits.next()??))
            }
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for CardColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl From<CardColor> for String {
    fn from(color: CardColor) -> Self {
        color.to_string()
    }
}

/// A text element owned by the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntity {
    pub content: String,
    pub font: FontResource,
    pub size: f64,
    /// Manual offset in canvas units
    pub offset: Vec2,
    /// Degrees, clockwise-positive
    pub rotation_deg: f64,
    pub color: CardColor,
    /// Outline stroke width; only the glyph is stroked
    pub stroke_width: f64,
}

impl TextEntity {
    pub const GLYPH_CONTENT: &'static str = "20";
    pub const GLYPH_SIZE: f64 = 550.0;
    pub const GLYPH_OFFSET: Vec2 = Vec2::new(0.0, -30.0);
    pub const GLYPH_STROKE_WIDTH: f64 = 4.0;
    pub const MESSAGE_CONTENT: &'static str = "Happy Birthday";
    pub const MESSAGE_SIZE: f64 = 90.0;
    pub const MESSAGE_OFFSET: Vec2 = Vec2::new(0.0, 80.0);

    /// The number text in its canonical state
    pub fn glyph_default(font: FontResource) -> Self {
        Self {
            content: Self::GLYPH_CONTENT.to_string(),
            font,
            size: Self::GLYPH_SIZE,
            offset: Self::GLYPH_OFFSET,
            rotation_deg: 0.0,
            color: CardColor::BLACK,
            stroke_width: Self::GLYPH_STROKE_WIDTH,
        }
    }

    /// The message text in its canonical state
    pub fn message_default(font: FontResource) -> Self {
        Self {
            content: Self::MESSAGE_CONTENT.to_string(),
            font,
            size: Self::MESSAGE_SIZE,
            offset: Self::MESSAGE_OFFSET,
            rotation_deg: 0.0,
            color: CardColor::BLACK,
            stroke_width: 0.0,
        }
    }

    /// Inputs of the outline extractor for this element
    pub fn glyph_spec(&self) -> GlyphSpec {
        GlyphSpec {
            content: self.content.clone(),
            font: self.font.clone(),
            size: self.size,
            offset: self.offset,
            rotation_deg: self.rotation_deg,
        }
    }
}

/// Derived description of a glyph run; recomputed from its `TextEntity`
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSpec {
    pub content: String,
    pub font: FontResource,
    pub size: f64,
    pub offset: Vec2,
    pub rotation_deg: f64,
}

impl GlyphSpec {
    /// The subset of inputs that requires a new outline extraction
    pub fn outline_key(&self) -> OutlineKey {
        OutlineKey {
            text: self.content.clone(),
            font: self.font.clone(),
            size_bits: self.size.to_bits(),
        }
    }
}

/// Value-equality key for cached outlines
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutlineKey {
    pub text: String,
    pub font: FontResource,
    size_bits: u64,
}

impl OutlineKey {
    pub fn size(&self) -> f64 {
        f64::from_bits(self.size_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!(CardColor::from_hex("#ff0000"), Some(CardColor::rgb(255, 0, 0)));
        assert_eq!(CardColor::from_hex("0f0"), Some(CardColor::rgb(0, 255, 0)));
        assert_eq!(
            CardColor::from_hex("#00000080").map(|c| c.a),
            Some(0x80)
        );
        assert_eq!(CardColor::from_hex("#12345"), None);
        assert_eq!(CardColor::from_hex("#zzzzzz"), None);
        assert_eq!(CardColor::rgb(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn test_outline_key_ignores_offset_and_rotation() {
        let mut glyph = TextEntity::glyph_default(FontResource::Builtin);
        let key = glyph.glyph_spec().outline_key();
        glyph.offset = Vec2::new(50.0, 50.0);
        glyph.rotation_deg = 12.0;
        assert_eq!(glyph.glyph_spec().outline_key(), key);
        glyph.size = 551.0;
        assert_ne!(glyph.glyph_spec().outline_key(), key);
        assert_eq!(glyph.glyph_spec().outline_key().size(), 551.0);
    }
}
