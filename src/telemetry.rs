// 📜 Logging - tracing subscriber setup for the binaries
//
// RUST_LOG wins when set; otherwise `default_filter` applies.
// CLI and server log to stderr so stdout stays clean for report lines and
// JSON. The TUI owns the terminal, so it logs to a file instead.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "jma-forecast.log";

/// Install the stderr subscriber; fails if one is already installed
pub fn init(default_filter: &str) -> Result<(), SetGlobalDefaultError> {
    install(std::io::stderr, default_filter, true)
}

/// Install a subscriber appending to `path` (no ANSI colors)
pub fn init_to_file(path: &Path, default_filter: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    install(Mutex::new(file), default_filter, false).context("Failed to install log subscriber")
}

/// Where the TUI writes its log lines
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn install<W>(writer: W, default_filter: &str, ansi: bool) -> Result<(), SetGlobalDefaultError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = Registry::default().with(filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false),
    );

    tracing::subscriber::set_global_default(subscriber)
}

// ============================================================================
// TESTS
// ============================================================================
