//! Plugin group definitions for the Glyphcard application
//!
//! Organized into logical groups for clarity and maintainability

use bevy::app::{PluginGroup, PluginGroupBuilder};

/// Plugin group for input, loading, and export
#[derive(Default)]
pub struct CorePluginGroup;

impl PluginGroup for CorePluginGroup {
    fn build(self) -> PluginGroupBuilder {
        use crate::systems::{
            AsyncLoadingPlugin, CardSystemSetsPlugin, ExportPlugin, FileDropPlugin,
            InputConsumerPlugin,
        };

        PluginGroupBuilder::start::<Self>()
            .add(CardSystemSetsPlugin) // Must be added before the plugins that use the sets
            .add(InputConsumerPlugin)
            .add(FileDropPlugin)
            .add(AsyncLoadingPlugin)
            .add(ExportPlugin)
    }
}

/// Plugin group for rendering functionality
#[derive(Default)]
pub struct RenderingPluginGroup;

impl PluginGroup for RenderingPluginGroup {
    fn build(self) -> PluginGroupBuilder {
        use crate::rendering::CanvasDisplayPlugin;

        PluginGroupBuilder::start::<Self>().add(CanvasDisplayPlugin)
    }
}
