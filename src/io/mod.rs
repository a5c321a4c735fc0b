pub mod image_loader;

pub use image_loader::{decode_bytes, decode_file, Bitmap};
