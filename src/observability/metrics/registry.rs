//! # Metrics Registry
//!
//! Prometheus metrics registry setup, registration and text encoding.

use anyhow::Result;
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::LazyLock;

/// Global Prometheus metrics registry
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Register all metrics with the Prometheus registry
///
/// Prometheus `Registry::register()` takes ownership (`Box<dyn Collector>`),
/// so the metrics are cloned. Metrics internally use Arc, so clones share state.
///
/// # Errors
///
/// Returns an error if a metric is registered twice.
pub fn register_metrics() -> Result<()> {
    super::poll_metrics::register_poll_metrics()?;
    Ok(())
}

/// Encode all registered metrics in the Prometheus text exposition format
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn gather_metrics() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
