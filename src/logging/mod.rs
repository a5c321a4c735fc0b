//! Application logging functionality
//!
//! The window uses Bevy's `LogPlugin` (see `systems::plugins`). Headless runs
//! have no Bevy app, so they install a `tracing-subscriber` stack here: a
//! stderr layer filtered by `RUST_LOG` and, when the config directory exists,
//! a daily log file under ~/.config/glyphcard/logs/.

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::core::config::ConfigFile;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "glyphcard=info";

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

/// Get the path to today's log file
pub fn current_log_file() -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    logs_dir().join(format!("glyphcard.log.{}", timestamp))
}

/// Initialize the logs directory
pub fn initialize_logs_directory() -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir())?;
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the headless subscriber. Keep the returned guard alive until the
/// program exits so buffered file output is flushed.
pub fn init_headless() -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter());

    // Only log to disk for users who created the config directory
    let (file_layer, guard) = if ConfigFile::config_dir().exists() {
        initialize_logs_directory()?;
        let appender = tracing_appender::rolling::daily(logs_dir(), "glyphcard.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(env_filter());
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    if guard.is_some() {
        tracing::debug!("Logging to {:?}", current_log_file());
    }
    Ok(guard)
}
