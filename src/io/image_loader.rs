//! Image decoding
//!
//! Dropped or passed-in files are decoded into premultiplied RGBA pixmaps
//! that the compositor can draw directly. Anything that is not an image is
//! reported as `ImageDecode` and skipped by the caller.

use std::fmt;
use std::path::{Path, PathBuf};
use tiny_skia::{IntSize, Pixmap};
use tracing::debug;

use crate::core::errors::{CardContext, CardError, CardResult};
use crate::core::state::CardColor;

/// A decoded image ready for compositing
pub struct Bitmap {
    pixmap: Pixmap,
    source: Option<PathBuf>,
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("source", &self.source)
            .finish()
    }
}

impl Bitmap {
    /// Build from straight (non-premultiplied) RGBA8 data
    pub fn from_rgba8(
        width: u32,
        height: u32,
        mut rgba: Vec<u8>,
        source: Option<PathBuf>,
    ) -> Option<Self> {
        let size = IntSize::from_wh(width, height)?;
        if rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        for px in rgba.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a < 255 {
                for channel in &mut px[..3] {
                    *channel = ((*channel as u16 * a + 127) / 255) as u8;
                }
            }
        }
        let pixmap = Pixmap::from_vec(rgba, size)?;
        Some(Self { pixmap, source })
    }

    /// A single-color bitmap
    pub fn solid(width: u32, height: u32, color: CardColor) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(color.to_skia());
        Some(Self {
            pixmap,
            source: None,
        })
    }

    pub fn natural_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Height over width of the original image
    pub fn aspect_ratio(&self) -> f64 {
        self.natural_height() as f64 / self.natural_width() as f64
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Decode an in-memory image. `origin` is only used for error messages.
pub fn decode_bytes(bytes: &[u8], origin: &Path) -> CardResult<Bitmap> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| CardError::image_decode(origin, e))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(
        "Decoded {} as {}x{} image",
        origin.display(),
        width,
        height
    );
    Bitmap::from_rgba8(width, height, rgba.into_raw(), Some(origin.to_path_buf()))
        .ok_or_else(|| CardError::image_decode(origin, "image has no pixels"))
}

/// Read and decode an image file. Safe to call off the main thread.
pub fn decode_file(path: &Path) -> CardResult<Bitmap> {
    let bytes = std::fs::read(path).with_file_context("read", path)?;
    decode_bytes(&bytes, path)
}
