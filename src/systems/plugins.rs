//! Plugin management and configuration for Glyphcard
//!
//! Bevy's default plugins with the card's logging filter, plus the system
//! sets that fix the per-frame order: input, then background loading, then
//! the canvas render, then any pending export.

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;

use crate::core::config::{DEFAULT_WINDOW_SIZE, WINDOW_TITLE};

/// Per-frame ordering of the card systems
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardSets {
    /// Pointer, keyboard, and file drop; commits happen here
    Input,
    /// Apply finished font and image tasks, start new ones
    Loading,
    /// Rasterize the card into the window image
    Render,
    /// Snapshot after the render that cleared the selection chrome
    Export,
}

/// Configure logging with performance optimization for release builds
pub fn configure_logging() -> LogPlugin {
    #[cfg(debug_assertions)]
    {
        LogPlugin {
            level: Level::INFO,
            filter: "glyphcard=debug,bevy_render=warn,bevy_winit=warn,wgpu=warn,winit=warn"
                .to_string(),
            ..default()
        }
    }

    #[cfg(not(debug_assertions))]
    {
        LogPlugin {
            level: Level::WARN,
            filter: "glyphcard=warn,bevy=warn,wgpu=error,winit=error".to_string(),
            ..default()
        }
    }
}

/// Configure default Bevy plugins for the application
pub fn configure_default_plugins() -> bevy::app::PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.into(),
                resolution: DEFAULT_WINDOW_SIZE.into(),
                resizable: false,
                ..default()
            }),
            ..default()
        })
        .set(configure_logging())
}

/// Orders the card system sets
pub struct CardSystemSetsPlugin;

impl Plugin for CardSystemSetsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                CardSets::Input,
                CardSets::Loading,
                CardSets::Render,
                CardSets::Export,
            )
                .chain(),
        );
    }
}
