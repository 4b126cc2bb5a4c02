//! Process-wide tracing setup: console output plus a daily-rolling log file.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, anyhow};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LogOptions<'a> {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: &'a str,
    pub file_prefix: &'a str,
    pub directory: &'a Path,
    /// Rotated files kept on disk.
    pub max_files: usize,
}

impl<'a> LogOptions<'a> {
    pub fn new(level: &'a str, file_prefix: &'a str) -> Self {
        Self {
            level,
            file_prefix,
            directory: Path::new("logs"),
            max_files: 5,
        }
    }
}

/// Installs the global subscriber. Can succeed only once per process.
pub fn setup_logging(options: &LogOptions<'_>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(options.level))
        .with_context(|| format!("Invalid log filter '{}'", options.level))?;

    std::fs::create_dir_all(options.directory).with_context(|| {
        format!(
            "Failed to create log directory {}",
            options.directory.display()
        )
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(options.file_prefix)
        .filename_suffix("log")
        .max_log_files(options.max_files)
        .build(options.directory)
        .context("Failed to create log file appender")?;

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow!("Logging already initialized"))?;

    // Warnings and errors on stderr, the rest on stdout.
    let console_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Logger initialization failed")?;

    Ok(())
}
