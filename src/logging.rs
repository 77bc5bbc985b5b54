//! File-backed tracing setup.
//!
//! The terminal is owned by the TUI, so log output goes to
//! `<log dir>/mailverify.log` through a non-blocking writer. The returned
//! guard must be kept alive until exit to flush buffered lines.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::constants::APP_BINARY_NAME;

/// Installs the global subscriber writing to `dir`.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// when `verbose` is set.
pub fn init_logging(dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, format!("{APP_BINARY_NAME}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
