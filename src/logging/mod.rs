//! Structured logging module for the VLAN mapper
//!
//! Provides file-based logging with rotation and structured log output.
//! Logs are written to: `<config dir>/vlan-mapper/logs/`

pub mod macros;

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const APP_DIR: &str = "vlan-mapper";
const LOG_FILE_PREFIX: &str = "vlan-mapper.log";

/// Initialize the logging system
///
/// Console output goes to stderr so reports on stdout stay clean.
/// Logs are also written as JSON to a daily rotated file.
///
/// Set `RUST_LOG` to control the level (default `info`):
/// - `RUST_LOG=debug` shows the per-MAC classification decisions
/// - `RUST_LOG=warn` shows only skipped records and multi-VLAN warnings
pub fn init_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .json();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        // Another subsystem or test may already own the global subscriber.
        if e.to_string().contains("already been set") {
            return Ok(log_dir);
        }
        return Err(Box::new(e));
    }

    tracing::info!("Logging initialized. Log directory: {}", log_dir.display());

    Ok(log_dir)
}

/// Returns: `%LOCALAPPDATA%/vlan-mapper/logs` on Windows
///          `~/.config/vlan-mapper/logs` on Linux/macOS
fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .ok_or("Could not find APPDATA directory")?
            .join(APP_DIR)
    } else {
        dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join(APP_DIR)
    };

    Ok(base_dir.join("logs"))
}

/// Current log file path
pub fn get_current_log_file() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("{}.{}", LOG_FILE_PREFIX, today)))
}
