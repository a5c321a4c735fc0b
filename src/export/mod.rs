//! Snapshot export
//!
//! Rasterize the committed card and wrap it in a one-page PDF.

pub mod pdf;
pub mod snapshot;

pub use snapshot::{default_export_path, Document};
