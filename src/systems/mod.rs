//! Bevy Systems and Plugins
//!
//! This module contains the Bevy side of the card:
//! - Plugin and logging configuration
//! - Pointer and keyboard input mapped onto the session
//! - File drops and background decoding
//! - Export requests from the window

pub mod async_loading;
pub mod export_requests;
pub mod file_drop;
pub mod input_consumer;
pub mod plugins;

// Re-export commonly used items
pub use async_loading::{AsyncLoadingPlugin, PendingLoads};
pub use export_requests::{ExportPlugin, ExportRequest};
pub use file_drop::FileDropPlugin;
pub use input_consumer::{InputConsumerPlugin, ShortcutAction};
pub use plugins::{configure_default_plugins, configure_logging, CardSets, CardSystemSetsPlugin};
