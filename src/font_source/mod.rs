//! Font sources and outline extraction
//!
//! This module turns a font resource, a string, and a size into a filled
//! vector path plus its bounding box. It knows nothing about the canvas;
//! centering happens in `geometry::mask`.

pub mod cache;
pub mod library;
pub mod metrics;
pub mod outline;

// Explicit re-exports for public API
pub use cache::FontCache;
pub use library::{FontLibrary, FontResource, LoadedFont, FONT_CATALOG};
pub use metrics::{FontInfo, FontMetrics};
pub use outline::{extract, GlyphOutline, OutlineBounds};
