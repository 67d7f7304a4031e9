//! Tracing setup for stitch runs.
//!
//! Events go to `$XDG_STATE_HOME/stitch/stitch.log` so the progress line on
//! stderr stays readable. `RUST_LOG` overrides the default filter.

use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const LOG_PREFIX: &str = "stitch";
const LOG_FILE: &str = "stitch.log";
const DEFAULT_FILTER: &str = "info,stitch=debug,stitch_core=debug";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn install<W>(writer: W) -> Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("install tracing subscriber: {}", e))
}

/// Where the log file lives; the state directory is created if missing.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix(LOG_PREFIX)?;
    let dir = dirs.get_state_home();
    fs::create_dir_all(&dir).with_context(|| format!("create log dir {}", dir.display()))?;
    Ok(dir.join(LOG_FILE))
}

/// Append run logs to the XDG state log file and return its path.
///
/// Errors (unwritable state dir, subscriber already set) are returned so the
/// CLI can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    install(Mutex::new(file))?;
    tracing::info!(log = %path.display(), "stitch logging initialized");
    Ok(path)
}

/// Log to stderr only. Never fails; a second subscriber is silently ignored.
pub fn init_logging_stderr() {
    let _ = install(std::io::stderr);
}
