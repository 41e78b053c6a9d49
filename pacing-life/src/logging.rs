//! Subscriber setup for hosts and tools.

use tracing_subscriber::EnvFilter;

use crate::error::{LifeError, Result};

/// Install a global `fmt` subscriber. `RUST_LOG` wins when set; otherwise
/// `level` (e.g. `"info"` or `"pacing_core=debug"`) is used.
///
/// # Errors
///
/// Returns [`LifeError::Logging`] if `level` is not a valid filter or a
/// global subscriber is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| LifeError::Logging(e.to_string()))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LifeError::Logging(e.to_string()))
}
