//! Image selection and direct manipulation
//!
//! The controller owns the live node arena and the interaction in
//! progress; the scene stays the authority for committed geometry.

pub mod commands;
pub mod controller;
pub mod drag;
pub mod handles;
pub mod nodes;
pub mod nudge;

pub use controller::{EntityState, Interaction, InteractionController};
pub use handles::{handle_rects, hit_handle, HandleKind};
pub use nodes::{LiveNode, NodeArena};
pub use nudge::NudgeDirection;
