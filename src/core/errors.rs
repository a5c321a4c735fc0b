//! Error types for the card compositor
//!
//! Every error in the core is recoverable: a font that fails to load keeps
//! the previous mask on screen, a broken image file is skipped, and a
//! mutation aimed at a node that is not mounted yet is ignored. The variants
//! below name those cases so callers can decide how loudly to log them.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::state::EntityId;

/// Result alias used across the crate
pub type CardResult<T> = Result<T, CardError>;

#[derive(Error, Debug)]
pub enum CardError {
    /// The font resource could not be read or parsed
    #[error("failed to load font '{resource}': {reason}")]
    FontLoad { resource: String, reason: String },

    /// Outline construction failed for degenerate input
    #[error("failed to build outline for '{text}' at size {size}: {reason}")]
    PathGeneration {
        text: String,
        size: f64,
        reason: String,
    },

    /// A dropped or passed-in file is not a decodable image
    #[error("failed to decode image {}: {reason}", path.display())]
    ImageDecode { path: PathBuf, reason: String },

    /// A mutation targeted an entity whose live node is not mounted
    #[error("no mounted node for entity {0}")]
    StaleNode(EntityId),

    /// The compositor could not allocate or draw the canvas
    #[error("render failed: {0}")]
    Render(String),

    /// Rasterizing or encoding the export document failed
    #[error("export failed: {0}")]
    Export(String),

    #[error("{operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CardError {
    pub fn font_load(resource: impl ToString, reason: impl ToString) -> Self {
        Self::FontLoad {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn path_generation(text: &str, size: f64, reason: impl ToString) -> Self {
        Self::PathGeneration {
            text: text.to_string(),
            size,
            reason: reason.to_string(),
        }
    }

    pub fn image_decode(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::ImageDecode {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error is the expected no-op case for unmounted nodes
    pub fn is_stale_node(&self) -> bool {
        matches!(self, Self::StaleNode(_))
    }
}

/// Adds file context to `std::io` results
pub trait CardContext<T> {
    fn with_file_context(self, operation: &'static str, path: impl AsRef<Path>) -> CardResult<T>;
}

impl<T> CardContext<T> for Result<T, std::io::Error> {
    fn with_file_context(self, operation: &'static str, path: impl AsRef<Path>) -> CardResult<T> {
        self.map_err(|source| CardError::Io {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Log a recovered error and swallow it.
///
/// Stale node mutations are routine (input can arrive before the first
/// paint), so they only show up at debug level.
pub fn log_recoverable(context: &str, result: CardResult<()>) {
    if let Err(error) = result {
        if error.is_stale_node() {
            debug!("{context}: ignored, {error}");
        } else {
            warn!("{context}: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_context_keeps_path() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let error = result
            .with_file_context("read", "/tmp/nowhere.ttf")
            .unwrap_err();
        let message = error.to_string();
        assert!(message.contains("read"));
        assert!(message.contains("nowhere.ttf"));
    }

    #[test]
    fn test_stale_node_detection() {
        assert!(CardError::StaleNode(EntityId(3)).is_stale_node());
        assert!(!CardError::Export("boom".into()).is_stale_node());
    }
}
