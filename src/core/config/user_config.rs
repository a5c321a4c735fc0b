//! User configuration file handling
//!
//! Manages settings from ~/.config/glyphcard/settings.json

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::CardSettings;
use crate::core::state::CardColor;
use crate::font_source::FontResource;

/// User configuration from ~/.config/glyphcard/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments.
/// Every field is optional so a file only needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    /// Directory searched for catalogue fonts
    pub font_dir: Option<PathBuf>,
    /// Glyph font: "builtin", a catalogue family, or a font file
    pub glyph_font: Option<String>,
    pub message_font: Option<String>,
    /// Where exports land when no path is given
    pub export_dir: Option<PathBuf>,
    pub stroke_width: Option<f64>,
    /// Hex colors like "#1a1a1a"
    pub glyph_color: Option<String>,
    pub message_color: Option<String>,
    pub background: Option<String>,
    pub ghost_opacity: Option<f32>,
}

impl ConfigFile {
    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Get the path to the glyphcard config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("glyphcard")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Layer the file's values over `settings`. Unparseable colors are
    /// logged and ignored.
    pub fn apply(&self, settings: &mut CardSettings) {
        if let Some(dir) = &self.font_dir {
            settings.font_dir = dir.clone();
        }
        if let Some(font) = &self.glyph_font {
            settings.default_glyph_font = FontResource::parse(font);
        }
        if let Some(font) = &self.message_font {
            settings.default_message_font = FontResource::parse(font);
        }
        if let Some(dir) = &self.export_dir {
            settings.export_dir = dir.clone();
        }
        if let Some(width) = self.stroke_width {
            settings.text.stroke_width = width.clamp(0.0, settings.text_controls.max_stroke_width);
        }
        if let Some(opacity) = self.ghost_opacity {
            settings.render.ghost_opacity = opacity.clamp(0.0, 1.0);
        }
        apply_color(&self.glyph_color, "glyph_color", &mut settings.text.glyph_color);
        apply_color(&self.message_color, "message_color", &mut settings.text.message_color);
        apply_color(&self.background, "background", &mut settings.render.background);
    }

    /// The file written by `--new-config`
    pub fn starter() -> Self {
        let defaults = CardSettings::default();
        Self {
            font_dir: Some(defaults.font_dir),
            glyph_font: Some(font_setting(&defaults.default_glyph_font)),
            message_font: Some(font_setting(&defaults.default_message_font)),
            export_dir: None,
            stroke_width: Some(defaults.text.stroke_width),
            glyph_color: Some(defaults.text.glyph_color.to_string()),
            message_color: Some(defaults.text.message_color.to_string()),
            background: Some(defaults.render.background.to_string()),
            ghost_opacity: Some(defaults.render.ghost_opacity),
        }
    }

    /// Initialize the complete user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/glyphcard directory structure
    /// 2. A settings.json file with default values
    /// 3. A logs/ directory for application logs
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        let config_dir = Self::config_dir();

        fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = config_dir.join("logs");
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = Self::config_path();
        if !settings_path.exists() {
            Self::starter().save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("You can now:");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - View application logs in: {:?}", logs_dir);

        Ok(())
    }
}

/// Inverse of `FontResource::parse`
fn font_setting(resource: &FontResource) -> String {
    match resource {
        FontResource::Builtin => "builtin".to_string(),
        other => other.to_string(),
    }
}

fn apply_color(value: &Option<String>, field: &str, target: &mut CardColor) {
    let Some(text) = value else { return };
    match CardColor::from_hex(text) {
        Some(color) => *target = color,
        None => warn!("Ignoring {} '{}': not a hex color", field, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_only_overrides_named_fields() {
        let config: ConfigFile =
            serde_json::from_str(r##"{"stroke_width": 25.0, "glyph_color": "#ff0000"}"##).unwrap();
        let mut settings = CardSettings::default();
        config.apply(&mut settings);
        assert_eq!(settings.text.stroke_width, 10.0);
        assert_eq!(settings.text.glyph_color, CardColor::rgb(255, 0, 0));
        assert_eq!(settings.render.ghost_opacity, CardSettings::default().render.ghost_opacity);
    }

    #[test]
    fn test_bad_color_is_ignored() {
        let config = ConfigFile {
            background: Some("not-a-color".into()),
            ..Default::default()
        };
        let mut settings = CardSettings::default();
        config.apply(&mut settings);
        assert_eq!(settings.render.background, CardColor::WHITE);
    }

    #[test]
    fn test_starter_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        ConfigFile::starter().save_to(&path).unwrap();
        assert_eq!(ConfigFile::load_from(&path), Some(ConfigFile::starter()));
    }
}
