//! # Logging
//!
//! Installs the `tracing` subscriber used by the whole process.

use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_LOG_FILTER;

/// Install the global fmt subscriber, filtered by `RUST_LOG`
///
/// Falls back to [`DEFAULT_LOG_FILTER`] when `RUST_LOG` is unset or invalid.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        tracing::debug!("Tracing subscriber already initialized: {}", e);
    }
}
