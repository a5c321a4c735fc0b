//! Rendering and Visualization
//!
//! - Layer ordering for the card composite
//! - tiny-skia compositor with per-image source-in groups
//! - Selection chrome for interactive renders
//! - Display of the composite in the Bevy window

pub mod canvas_display;
pub mod compositor;
pub mod layers;
pub mod path_conversion;
pub mod selection;

// Re-export commonly used items
pub use canvas_display::{world_to_canvas, CanvasDisplayPlugin, CanvasImage, CanvasSprite};
pub use compositor::{render, CompositeInputs, RenderOptions};
pub use layers::{build_layers, Layer, LayerOptions};
