//! Glyphcard
pub mod core;
pub mod editing;
pub mod export;
pub mod font_source;
pub mod geometry;
pub mod io;
pub mod logging;
pub mod rendering;
pub mod systems;
pub mod utils;
