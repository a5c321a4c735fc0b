//! Snapshot documents
//!
//! A document is the exported card held in memory: one page, one raster.

use chrono::Local;
use std::path::{Path, PathBuf};
use tiny_skia::Pixmap;
use tracing::info;

use super::pdf::{encode_jpeg, single_image_pdf};
use crate::core::config::ExportSettings;
use crate::core::errors::{CardContext, CardResult};

#[derive(Debug, Clone)]
pub struct Document {
    pub page_size_pt: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    bytes: Vec<u8>,
}

impl Document {
    /// Encode a rendered snapshot as a one-page PDF
    pub fn from_snapshot(pixmap: &Pixmap, settings: &ExportSettings) -> CardResult<Self> {
        let jpeg = encode_jpeg(pixmap, settings.jpeg_quality)?;
        let bytes = single_image_pdf(&jpeg, pixmap.width(), pixmap.height(), settings.page_size_pt);
        Ok(Self {
            page_size_pt: settings.page_size_pt,
            pixel_width: pixmap.width(),
            pixel_height: pixmap.height(),
            bytes,
        })
    }

    pub fn page_count(&self) -> usize {
        1
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the document, creating parent directories as needed
    pub fn persist(&self, path: &Path) -> CardResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_file_context("create directory", parent)?;
        }
        std::fs::write(path, &self.bytes).with_file_context("write", path)?;
        info!(
            "Exported {}x{} card to {}",
            self.pixel_width,
            self.pixel_height,
            path.display()
        );
        Ok(())
    }
}

/// Timestamped file name inside `dir`
pub fn default_export_path(dir: &Path) -> PathBuf {
    dir.join(format!("card-{}.pdf", Local::now().format("%Y%m%d-%H%M%S")))
}
