//! Application settings
//!
//! Every tunable constant of the compositor and the interaction controller
//! lives here so the rest of the code never hard-codes a size or a step.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::state::CardColor;
use crate::font_source::FontResource;

pub const WINDOW_TITLE: &str = "Glyphcard";

/// Fixed canvas edge length in canvas units (pixels at 1:1)
pub const CANVAS_SIZE: f32 = 800.0;

/// Window is the canvas plus a thin margin
pub const DEFAULT_WINDOW_SIZE: (f32, f32) = (CANVAS_SIZE + 40.0, CANVAS_SIZE + 40.0);

/// Arrow key and drag tuning for placed images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSettings {
    /// Canonical image width used on drop and reset
    pub default_image_width: f64,
    /// Smallest width or height a resize may produce
    pub min_image_size: f64,
    /// Pointer travel before a press turns into a drag
    pub drag_threshold: f64,
    /// Arrow key nudge distance
    pub nudge_step: f64,
    /// Rotation applied per image rotate command, degrees
    pub image_rotate_step: f64,
    /// Edge length of a resize handle hit box
    pub handle_size: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            default_image_width: 200.0,
            min_image_size: 20.0,
            drag_threshold: 3.0,
            nudge_step: 1.0,
            image_rotate_step: 1.0,
            handle_size: 10.0,
        }
    }
}

/// Step sizes used by the glyph and message controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextControlSettings {
    pub move_step: f64,
    pub rotate_step: f64,
    pub max_stroke_width: f64,
}

impl Default for TextControlSettings {
    fn default() -> Self {
        Self {
            move_step: 10.0,
            rotate_step: 1.0,
            max_stroke_width: 10.0,
        }
    }
}

/// Snapshot export parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Supersampling factor applied when rasterizing for export
    pub scale: f32,
    /// Edge length of the square output page in PDF points
    pub page_size_pt: f32,
    /// JPEG quality of the embedded raster
    pub jpeg_quality: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            page_size_pt: 576.0,
            jpeg_quality: 92,
        }
    }
}

/// Look of the composite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub canvas_size: f32,
    pub background: CardColor,
    /// Opacity of the faint full silhouette beneath the photos, 0 disables it
    pub ghost_opacity: f32,
    pub selection_color: CardColor,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            background: CardColor::WHITE,
            ghost_opacity: 0.1,
            selection_color: CardColor::rgb(0, 161, 255),
        }
    }
}

/// Starting look of the glyph and message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDefaults {
    pub glyph_color: CardColor,
    pub message_color: CardColor,
    pub stroke_width: f64,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            glyph_color: CardColor::BLACK,
            message_color: CardColor::BLACK,
            stroke_width: 4.0,
        }
    }
}

/// Main settings resource
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CardSettings {
    pub interaction: InteractionSettings,
    pub text_controls: TextControlSettings,
    pub export: ExportSettings,
    pub render: RenderSettings,
    pub text: TextDefaults,
    /// Font used for the glyph when nothing else is configured
    pub default_glyph_font: FontResource,
    /// Font used for the message when nothing else is configured
    pub default_message_font: FontResource,
    /// Where catalogue family names and relative font files are looked up
    pub font_dir: PathBuf,
    /// Where exports land when no explicit path is given
    pub export_dir: PathBuf,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            interaction: InteractionSettings::default(),
            text_controls: TextControlSettings::default(),
            export: ExportSettings::default(),
            render: RenderSettings::default(),
            text: TextDefaults::default(),
            default_glyph_font: FontResource::default(),
            default_message_font: FontResource::default(),
            font_dir: PathBuf::from("assets/fonts"),
            export_dir: PathBuf::from("."),
        }
    }
}

impl CardSettings {
    pub fn canvas_size(&self) -> f64 {
        self.render.canvas_size as f64
    }

    /// Canvas center in canvas units
    pub fn canvas_center(&self) -> kurbo::Point {
        let half = self.canvas_size() / 2.0;
        kurbo::Point::new(half, half)
    }
}
