//! Glyph and message controls
//!
//! Step-wise edits of the two text elements. The glyph is positioned by
//! subtracting its center from the canvas center, so moving it right means
//! decreasing its offset; the message offset is applied directly.

use tracing::debug;

use super::selection::NudgeDirection;
use crate::core::config::TextControlSettings;
use crate::core::state::{CardColor, TextEntity, TextRole};
use crate::font_source::FontResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    /// Adds to the rotation
    Left,
    /// Subtracts from the rotation
    Right,
}

/// Move a text element one step in the given screen direction
pub fn move_text(
    text: &mut TextEntity,
    role: TextRole,
    direction: NudgeDirection,
    settings: &TextControlSettings,
) {
    let delta = direction.vector(settings.move_step);
    match role {
        TextRole::Glyph => text.offset -= delta,
        TextRole::Message => text.offset += delta,
    }
    debug!("{:?} offset now ({}, {})", role, text.offset.x, text.offset.y);
}

pub fn rotate_text(text: &mut TextEntity, direction: RotateDirection, settings: &TextControlSettings) {
    match direction {
        RotateDirection::Left => text.rotation_deg += settings.rotate_step,
        RotateDirection::Right => text.rotation_deg -= settings.rotate_step,
    }
}

/// Canonical number text, keeping color and stroke
pub fn reset_glyph(text: &mut TextEntity, font: FontResource) {
    let defaults = TextEntity::glyph_default(font);
    text.content = defaults.content;
    text.font = defaults.font;
    text.size = defaults.size;
    text.offset = defaults.offset;
    text.rotation_deg = defaults.rotation_deg;
}

/// Canonical message text, keeping font and color
pub fn reset_message(text: &mut TextEntity) {
    let defaults = TextEntity::message_default(text.font.clone());
    text.content = defaults.content;
    text.size = defaults.size;
    text.offset = defaults.offset;
    text.rotation_deg = defaults.rotation_deg;
}

fn is_digits(input: &str) -> bool {
    input.chars().all(|c| c.is_ascii_digit())
}

/// Replace the glyph content. Anything but digits is ignored.
pub fn set_glyph_content(text: &mut TextEntity, input: &str) -> bool {
    if !is_digits(input) {
        debug!("Ignoring non-digit glyph content '{}'", input);
        return false;
    }
    text.content = input.to_string();
    true
}

/// Parse a size field. Non-digits are ignored, and an empty field leaves
/// the previous size (and therefore the previous mask) in place.
pub fn set_size(text: &mut TextEntity, input: &str) -> bool {
    if input.is_empty() || !is_digits(input) {
        return false;
    }
    match input.parse::<u32>() {
        Ok(size) if size > 0 => {
            text.size = size as f64;
            true
        }
        _ => false,
    }
}

/// Set the outline stroke width, clamped to `0..=max_stroke_width`
pub fn set_stroke_width(text: &mut TextEntity, width: f64, settings: &TextControlSettings) {
    if width.is_finite() {
        text.stroke_width = width.clamp(0.0, settings.max_stroke_width);
    }
}

/// Set the color from a hex string; invalid input is ignored
pub fn set_color(text: &mut TextEntity, input: &str) -> bool {
    match CardColor::from_hex(input) {
        Some(color) => {
            text.color = color;
            true
        }
        None => false,
    }
}
