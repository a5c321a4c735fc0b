//! Editing Functionality
//!
//! - Selection, drag, resize, and commands for placed images
//! - Step-wise controls for the glyph and message text

pub mod glyph_controls;
pub mod selection;

pub use glyph_controls::RotateDirection;
pub use selection::{EntityState, InteractionController, NudgeDirection};
