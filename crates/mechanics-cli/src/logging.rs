//! Log subscriber setup.
//!
//! Logs go to stderr so that stdout stays clean for JSON and CSV output.
//! `RUST_LOG` takes precedence over the `-v` count.

use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Builds the filter for `level`, preferring `RUST_LOG` when it is set and valid.
#[must_use]
pub fn filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(level: LogLevel) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}
