//! Application initialization and management
//!
//! This module contains the core application setup, including:
//! - App builder functions
//! - Plugin organization
//! - Seeding the card session from settings and CLI flags

pub mod builder;
pub mod plugins;

// Re-export the main app creation functions for convenience
pub use builder::{build_session, create_app, place_images};
