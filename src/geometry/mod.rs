//! Geometric Primitives and Operations

pub mod mask;
pub mod utilities;

// Re-export commonly used items
pub use mask::{MaskGeometry, MaskGeometryCache};
pub use utilities::{axis_lock_delta, axis_lock_position, exceeds_threshold};
