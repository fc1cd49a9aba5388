//! File-backed tracing setup.
//!
//! The terminal belongs to the UI, so log lines go to `~/.recall/recall.log`.
//! The level comes from the `RECALL_LOG` env filter and defaults to `info`.

use crate::core::constants::LOG_FILE;
use crate::utils::persistence::save_path;
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "RECALL_LOG";

/// Install the global subscriber. Fails if the log file can't be opened or a
/// subscriber is already installed.
pub fn init() -> io::Result<()> {
    let path = save_path(LOG_FILE)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(io::Error::other)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
}
