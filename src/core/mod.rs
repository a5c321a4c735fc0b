//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - Application initialization and the headless runner
//! - The card state: scene, session, and text/image entities
//! - Settings, config file, and CLI handling
//! - The error type shared by every module

pub mod app;
pub mod config;
pub mod errors;
pub mod platform;
pub mod runner;
pub mod state;

// Re-export commonly used items
pub use app::create_app;
pub use config::{CardSettings, CliArgs};
pub use errors::{CardError, CardResult};
pub use runner::run_app;
pub use state::CardSession;
