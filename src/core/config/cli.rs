//! Command line interface for Glyphcard
//!
//! Handles parsing command line arguments and provides validation for user
//! inputs before the window or the headless export starts.

use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

use super::settings::CardSettings;
use super::user_config::ConfigFile;
use crate::font_source::FontResource;

/// Glyphcard CLI arguments
///
/// Examples:
///   glyphcard                                   # Default "20" card
///   glyphcard --number 7 --image kid.jpg        # Number 7 with one photo
///   glyphcard --font "Gasoek One" --size 600    # Catalogue font, bigger glyph
///   glyphcard --image a.png --export card.pdf   # Render without a window
#[derive(Parser, Debug, Resource, Clone, Default)]
#[clap(
    name = "glyphcard",
    version,
    about = "Fill a big number with photos and export it as a card",
    long_about = "Glyphcard composes a square card: one or more photos clipped to the silhouette of a large glyph, an optional message, and a stroked outline. The result can be exported as a one-page PDF."
)]
pub struct CliArgs {
    /// Digits shown as the glyph
    #[clap(long = "number", short = 'n', help = "Glyph digits (default 20)")]
    pub number: Option<String>,

    /// Glyph font: "builtin", a catalogue family name, or a font file
    #[clap(
        long = "font",
        short = 'f',
        help = "Glyph font",
        long_help = "Font for the glyph. Accepts \"builtin\", a catalogue family name such as \"Gasoek One\", or a path to a .ttf/.otf file."
    )]
    pub font: Option<String>,

    /// Glyph size in canvas units
    #[clap(long = "size", short = 's', help = "Glyph size (digits only)")]
    pub size: Option<String>,

    /// Message text drawn over the card
    #[clap(long = "message", short = 'm', help = "Message text")]
    pub message: Option<String>,

    #[clap(long = "message-font", help = "Message font")]
    pub message_font: Option<String>,

    /// Images placed on the card, in order
    #[clap(long = "image", short = 'i', help = "Image to place (repeatable)")]
    pub images: Vec<PathBuf>,

    /// Render and export without opening a window
    #[clap(
        long = "export",
        short = 'o',
        help = "Export to a PDF and exit",
        long_help = "Render the card without opening a window and write it as a one-page PDF to the given path."
    )]
    pub export: Option<PathBuf>,

    /// Use a settings file other than ~/.config/glyphcard/settings.json
    #[clap(long = "config", help = "Settings file to use")]
    pub config: Option<PathBuf>,

    /// Initialize user configuration directory with settings
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with default settings",
        long_help = "Initialize the ~/.config/glyphcard directory with a settings.json file and a logs/ directory."
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that all paths exist and numeric fields are digits before
    /// the application starts.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(number) = &self.number {
            if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!("Glyph number must be digits only: '{number}'"));
            }
        }

        if let Some(size) = &self.size {
            match size.parse::<u32>() {
                Ok(value) if value > 0 && size.chars().all(|c| c.is_ascii_digit()) => {}
                _ => return Err(format!("Size must be a positive whole number: '{size}'")),
            }
        }

        for image in &self.images {
            if !image.is_file() {
                return Err(format!(
                    "Image does not exist: {}\nMake sure the path is correct and the file exists.",
                    image.display()
                ));
            }
        }

        if let Some(config) = &self.config {
            if !config.is_file() {
                return Err(format!("Settings file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Build settings from defaults, the config file, and CLI flags
    ///
    /// Priority order:
    /// 1. CLI arguments
    /// 2. Config file (--config or ~/.config/glyphcard/settings.json)
    /// 3. Built-in defaults
    pub fn resolve_settings(&self) -> CardSettings {
        let mut settings = CardSettings::default();
        let config = match &self.config {
            Some(path) => ConfigFile::load_from(path),
            None => ConfigFile::load(),
        };
        if let Some(config) = config {
            config.apply(&mut settings);
        }
        if let Some(font) = &self.font {
            debug!("Using glyph font from CLI: {}", font);
            settings.default_glyph_font = FontResource::parse(font);
        }
        if let Some(font) = &self.message_font {
            settings.default_message_font = FontResource::parse(font);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("glyphcard").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_repeatable_images() {
        let args = parse(&["--image", "a.png", "-i", "b.jpg", "--number", "7"]);
        assert_eq!(args.images, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
        assert_eq!(args.number.as_deref(), Some("7"));
    }

    #[test]
    fn test_validate_digits() {
        assert!(parse(&["--number", "2x"]).validate().is_err());
        assert!(parse(&["--size", "12.5"]).validate().is_err());
        assert!(parse(&["--size", "0"]).validate().is_err());
        assert!(parse(&["--number", "42", "--size", "300"]).validate().is_ok());
        assert!(parse(&["--image", "/no/such/file.png"]).validate().is_err());
    }

    #[test]
    fn test_cli_font_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"glyph_font": "Coiny", "ghost_opacity": 0.3}"#).unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let settings = parse(&["--config", &path_arg]).resolve_settings();
        assert_eq!(settings.default_glyph_font, FontResource::Family("Coiny".into()));
        assert_eq!(settings.render.ghost_opacity, 0.3);

        let settings = parse(&["--config", &path_arg, "--font", "builtin"]).resolve_settings();
        assert_eq!(settings.default_glyph_font, FontResource::Builtin);
    }
}
