//! Console output plus the append-only error log.
//!
//! [`init`] installs the global subscriber and hands back a [`LoggingGuard`].
//! The guard owns the file writer; keep it alive for the whole run; dropping
//! it flushes pending lines.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Level written to the error log. Console verbosity follows `RUST_LOG`.
pub const ERROR_LOG_LEVEL: LevelFilter = LevelFilter::WARN;

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Open (creating if absent) the error log at `log_path` and register the
/// global subscriber.
pub fn init(log_path: &Path) -> Result<LoggingGuard> {
    let dir = log_path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .context("error log path has no file name")?;
    fs::create_dir_all(dir).with_context(|| format!("failed to create log dir: {:?}", dir))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter());

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking)
        .with_filter(ERROR_LOG_LEVEL);

    registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
