//! Application state management.
//!
//! The scene model (images and text), the tri-state used for anything that
//! arrives asynchronously, and the session that ties scene, caches, and the
//! interaction controller together.

pub mod image_entity;
pub mod loadable;
pub mod scene;
pub mod session;
pub mod text_entity;

// Re-export core state
pub use image_entity::{EntityId, ImageEntity, ImageGeometry};
pub use loadable::Loadable;
pub use scene::Scene;
pub use session::CardSession;
pub use text_entity::{CardColor, GlyphSpec, OutlineKey, TextEntity, TextRole};
