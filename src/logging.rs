//! File-backed tracing setup. The terminal belongs to the UI, so nothing is
//! ever written to stdout or stderr while it runs.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "clinicals=info";

/// Installs the global subscriber.
///
/// The returned guard flushes buffered lines when dropped and must live
/// until the program exits.
pub fn init(log_file: &Path) -> Result<WorkerGuard> {
    let (writer, guard) = file_writer(log_file)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    tracing::info!(path = %log_file.display(), "logging initialised");
    Ok(guard)
}

/// Splits `log_file` into directory and file name and opens a non-rotating appender.
fn file_writer(log_file: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let (directory, file_name) = split_log_path(log_file)?;
    fs::create_dir_all(&directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(&directory)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}

fn split_log_path(log_file: &Path) -> Result<(PathBuf, &std::ffi::OsStr)> {
    let file_name = log_file
        .file_name()
        .with_context(|| format!("log file path {} has no file name", log_file.display()))?;
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, file_name))
}
