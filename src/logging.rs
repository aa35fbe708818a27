//! Logging setup for binaries and tests that embed tidyframe.
//!
//! The library only emits `tracing` events; nothing is printed unless the host
//! installs a subscriber. [`init`] installs a console subscriber whose level is
//! taken from `RUST_LOG` (default `info`):
//!
//! ```no_run
//! tidyframe::logging::init().expect("Failed to initialize logging");
//!
//! tracing::info!("Cleaning started");
//! ```
//!
//! Step construction and per-step progress are logged at `debug`, so
//! `RUST_LOG=tidyframe=debug` shows every step a pipeline runs.

use anyhow::{Context as _, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

pub const DEFAULT_FILTER: &str = "info";

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns an error if neither directive can be parsed.
pub fn env_filter() -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")
}

/// Install the global console subscriber.
///
/// # Errors
///
/// Returns an error if the filter cannot be built or a global subscriber is
/// already installed.
pub fn init() -> Result<()> {
    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true);

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialized");

    Ok(())
}
