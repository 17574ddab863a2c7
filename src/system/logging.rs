//! Logging system initialization

use anyhow::{Context, Result};
use tracing_appender::rolling;

use crate::config::LoggingConfig;

const DEFAULT_LOG_NAME: &str = "adscope.log";

/// Create the log writer: rotating file, plain file or stdout
fn build_writer(config: &LoggingConfig) -> Result<Box<dyn std::io::Write + Send + Sync>> {
    let log_file = match config.file.as_deref() {
        Some(f) if !f.is_empty() => f,
        _ => return Ok(Box::new(std::io::stdout())),
    };

    let path = std::path::Path::new(log_file);
    if config.enable_rotation {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(std::path::Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_NAME);
        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
            .context("Failed to create rolling log appender")?;
        Ok(Box::new(appender))
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", log_file))?;
        Ok(Box::new(file))
    }
}

/// Initialize logging from `[logging]`
///
/// The returned guard must live until exit so buffered lines are flushed.
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let writer = build_writer(config)?;
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.level))
        .context("Invalid logging.level filter")?;

    let to_console = config.file.as_ref().is_none_or(|f| f.is_empty());
    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(to_console);

    if config.format == "json" {
        subscriber_builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {}", e))?;
    } else {
        subscriber_builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {}", e))?;
    }

    Ok(guard)
}
