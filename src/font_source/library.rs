//! Font resource resolution
//!
//! A font resource names where outline font bytes come from: the embedded
//! default, an explicit file, or a family name from the card catalogue that
//! is looked up inside the configured font directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use ttf_parser::Face;

use super::metrics::FontInfo;
use crate::core::errors::{CardError, CardResult};
use crate::utils::embedded_assets::{embedded_font, DEFAULT_FONT_BYTES, DEFAULT_FONT_NAME};

/// Family names offered to the user and the files that provide them
pub const FONT_CATALOG: &[(&str, &str)] = &[
    ("Gasoek One", "GasoekOne.ttf"),
    ("Arial Black", "arial_black.ttf"),
    ("Coiny", "Coiny-Regular.ttf"),
    ("Monsieur La Doulaise", "MonsieurLaDoulaise-Regular.ttf"),
    ("Imperial Script", "ImperialScript-Regular.ttf"),
    ("DejaVu Sans Bold", "DejaVuSans-Bold.ttf"),
];

/// Identity of a font resource; also the cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontResource {
    /// The font compiled into the binary
    #[default]
    Builtin,
    /// An explicit font file
    File(PathBuf),
    /// A catalogue family name or a bare file name inside the font directory
    Family(String),
}

impl FontResource {
    /// Interpret user input (CLI flag, control field) as a font resource
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("builtin") {
            return Self::Builtin;
        }
        let path = Path::new(trimmed);
        if path.components().count() > 1 || path.is_absolute() {
            Self::File(path.to_path_buf())
        } else {
            Self::Family(trimmed.to_string())
        }
    }

    /// File name a family resolves to, if it is a catalogue entry
    pub fn catalog_file(family: &str) -> Option<&'static str> {
        FONT_CATALOG
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(family))
            .map(|(_, file)| *file)
    }
}

impl fmt::Display for FontResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "{DEFAULT_FONT_NAME}"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Family(name) => write!(f, "{name}"),
        }
    }
}

/// Parsed and validated font bytes
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub resource: FontResource,
    pub info: FontInfo,
    data: Arc<[u8]>,
}

impl LoadedFont {
    /// Validate `data` as an outline font and capture its metadata
    pub fn from_bytes(resource: FontResource, data: Arc<[u8]>) -> CardResult<Self> {
        let face = Face::parse(&data, 0).map_err(|e| CardError::font_load(&resource, e))?;
        if face.units_per_em() == 0 {
            return Err(CardError::font_load(&resource, "units per em is zero"));
        }
        let info = FontInfo::from_face(&face);
        drop(face);
        Ok(Self {
            resource,
            info,
            data,
        })
    }

    /// Re-borrow the parsed face; parsing is a cheap table lookup
    pub fn face(&self) -> CardResult<Face<'_>> {
        Face::parse(&self.data, 0).map_err(|e| CardError::font_load(&self.resource, e))
    }
}

/// Resolves font resources to bytes
#[derive(Debug, Clone)]
pub struct FontLibrary {
    font_dir: PathBuf,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new("assets/fonts")
    }
}

impl FontLibrary {
    pub fn new(font_dir: impl Into<PathBuf>) -> Self {
        Self {
            font_dir: font_dir.into(),
        }
    }

    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }

    /// Resolve a resource to a file path; `None` for the embedded font
    pub fn resolve_path(&self, resource: &FontResource) -> Option<PathBuf> {
        match resource {
            FontResource::Builtin => None,
            FontResource::File(path) => Some(path.clone()),
            FontResource::Family(name) => {
                let file = FontResource::catalog_file(name).unwrap_or(name.as_str());
                Some(self.font_dir.join(file))
            }
        }
    }

    /// Read and validate a font. Safe to call off the main thread.
    pub fn load(&self, resource: &FontResource) -> CardResult<LoadedFont> {
        let data: Arc<[u8]> = match self.resolve_path(resource) {
            None => Arc::from(DEFAULT_FONT_BYTES),
            Some(path) => match std::fs::read(&path) {
                Ok(bytes) => Arc::from(bytes),
                Err(e) => {
                    // A missing assets directory still finds the bundled font
                    let fallback = path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .and_then(embedded_font);
                    match fallback {
                        Some(bytes) => Arc::from(bytes),
                        None => {
                            return Err(CardError::font_load(
                                resource,
                                format!("{}: {e}", path.display()),
                            ))
                        }
                    }
                }
            },
        };

        let font = LoadedFont::from_bytes(resource.clone(), data)?;
        debug!(
            "Loaded font {} as '{}'",
            resource,
            font.info.get_display_name()
        );
        Ok(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource_kinds() {
        assert_eq!(FontResource::parse("builtin"), FontResource::Builtin);
        assert_eq!(FontResource::parse(""), FontResource::Builtin);
        assert_eq!(
            FontResource::parse("Gasoek One"),
            FontResource::Family("Gasoek One".into())
        );
        assert_eq!(
            FontResource::parse("/usr/share/fonts/x.ttf"),
            FontResource::File(PathBuf::from("/usr/share/fonts/x.ttf"))
        );
    }

    #[test]
    fn test_catalog_resolution() {
        let library = FontLibrary::new("/fonts");
        let path = library
            .resolve_path(&FontResource::Family("gasoek one".into()))
            .unwrap();
        assert_eq!(path, PathBuf::from("/fonts/GasoekOne.ttf"));

        // Unknown names are treated as file names
        let path = library
            .resolve_path(&FontResource::Family("Custom.otf".into()))
            .unwrap();
        assert_eq!(path, PathBuf::from("/fonts/Custom.otf"));
    }

    #[test]
    fn test_builtin_loads() {
        let font = FontLibrary::default().load(&FontResource::Builtin).unwrap();
        assert!(font.face().is_ok());
        assert!(font.info.metrics.units_per_em > 0.0);
    }

    #[test]
    fn test_missing_file_is_font_load_error() {
        let library = FontLibrary::new("/definitely/not/here");
        let err = library
            .load(&FontResource::Family("Coiny".into()))
            .unwrap_err();
        assert!(matches!(err, CardError::FontLoad { .. }));
    }

    #[test]
    fn test_missing_dir_falls_back_to_embedded_file() {
        let library = FontLibrary::new("/definitely/not/here");
        assert!(library
            .load(&FontResource::Family("DejaVu Sans Bold".into()))
            .is_ok());
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = LoadedFont::from_bytes(
            FontResource::File("junk.ttf".into()),
            Arc::from(&b"not a font"[..]),
        )
        .unwrap_err();
        assert!(matches!(err, CardError::FontLoad { .. }));
    }
}
