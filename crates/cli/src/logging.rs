//! Logging setup: human-readable stderr plus a daily log file.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log file name for `date` (UTC).
pub fn log_file_name(date: NaiveDate) -> String {
    format!("metrics_log_{}.txt", date.format("%Y-%m-%d"))
}

/// Install the global subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Returns the path of
/// the log file being appended to.
pub fn init(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir).with_context(|| format!("failed to create log dir {}", log_dir.display()))?;

    let path = log_dir.join(log_file_name(Utc::now().date_naive()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(path)
}
