//! Application runner logic
//!
//! Handles the different ways to run Glyphcard: initializing the config
//! directory, rendering a card headless, or opening the window.

use crate::core::app::{build_session, place_images};
use crate::core::config::{CliArgs, ConfigFile};
use crate::logging;
use anyhow::Result;
use std::path::Path;

/// Create and run the application with the given CLI arguments.
/// Handles special CLI flags and delegates to appropriate runners.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .map_err(|e| anyhow::anyhow!("Failed to initialize config directory: {}", e));
    }

    if let Some(path) = cli_args.export.clone() {
        return run_headless(&cli_args, &path);
    }

    let mut app = crate::core::app::create_app(cli_args)?;
    app.run();
    Ok(())
}

/// Render the card and write it to `path` without opening a window
pub fn run_headless(cli_args: &CliArgs, path: &Path) -> Result<()> {
    let _guard = match logging::init_headless() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    cli_args
        .validate()
        .map_err(|e| anyhow::anyhow!("CLI validation failed: {}", e))?;

    let mut session = build_session(cli_args);
    let placed = place_images(&mut session, cli_args);
    tracing::info!("Placed {} of {} images", placed, cli_args.images.len());

    let document = session.export(path)?;
    tracing::info!(
        "Wrote {} ({}x{} px on a {}pt page)",
        path.display(),
        document.pixel_width,
        document.pixel_height,
        document.page_size_pt
    );
    Ok(())
}
