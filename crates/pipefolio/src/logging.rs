//! Diagnostic logging.
//!
//! The terminal belongs to the UI, so events only go to a file, and only
//! when one is requested with `--log-file` or `PIPEFOLIO_LOG`.

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PIPEFOLIO_LOG";
const DEFAULT_DIRECTIVES: &str = "pipefolio=info,pipefolio_core=info";

/// Log destination from the flag, falling back to the environment
pub fn log_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var_os(LOG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

/// Build the filter: `RUST_LOG` wins when set, otherwise info for our crates
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. Returns false when logging stays off.
pub fn init(log_file: Option<&Path>) -> Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("failed to install logger: {err}"))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(true)
}
