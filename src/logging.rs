//! Logging setup.
//!
//! Tasks log to stdout, which the container runtime ships to the log driver
//! (awslogs on Fargate). A log file is only written when one is configured,
//! since the container filesystem disappears with the task.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Open the optional log file in append mode, creating parent directories.
///
/// Returns `None` when no path is configured or the path is blank.
fn open_log_file(path: Option<&str>) -> Result<Option<Arc<File>>> {
    let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Some(Arc::new(file)))
}

fn make_writer(log_file: Option<Arc<File>>) -> BoxMakeWriter {
    match log_file {
        Some(file) => BoxMakeWriter::new(std::io::stdout.and(file)),
        None => BoxMakeWriter::new(std::io::stdout),
    }
}

fn install(level: &str, writer: BoxMakeWriter) {
    let filter = EnvFilter::from_default_env().add_directive(parse_level(level).into());

    // Plain output: the log driver stores escape codes verbatim.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();
}

/// Initialize logging to stdout, plus the log file when one is configured.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_file = open_log_file(config.file.as_deref())?;
    install(&config.level, make_writer(log_file));
    Ok(())
}

/// Initialize stdout-only logging.
///
/// Used when the configured log file cannot be opened.
pub fn init_console_only(level: &str) {
    install(level, make_writer(None));
}
