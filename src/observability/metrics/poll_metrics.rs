//! # Poll Metrics
//!
//! Metrics for the secret poll loop: iterations, credential rebuilds and fetches.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{Histogram, IntCounter, IntCounterVec};
use std::sync::LazyLock;

static POLL_ITERATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "keyvault_demo_poll_iterations_total",
        "Total number of poll iterations started",
    )
    .expect("Failed to create POLL_ITERATIONS_TOTAL metric - this should never happen")
});

static CREDENTIAL_REBUILD_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "keyvault_demo_credential_rebuild_errors_total",
        "Total number of iterations abandoned because credentials could not be rebuilt",
    )
    .expect("Failed to create CREDENTIAL_REBUILD_ERRORS_TOTAL metric - this should never happen")
});

static SECRET_FETCHES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "keyvault_demo_secret_fetches_total",
            "Total number of secret fetch attempts by identity and outcome",
        ),
        &["identity", "outcome"],
    )
    .expect("Failed to create SECRET_FETCHES_TOTAL metric - this should never happen")
});

static SECRET_FETCH_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "keyvault_demo_secret_fetch_duration_seconds",
            "Duration of secret fetch attempts in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 15.0]),
    )
    .expect("Failed to create SECRET_FETCH_DURATION metric - this should never happen")
});

pub(crate) fn register_poll_metrics() -> Result<()> {
    REGISTRY.register(Box::new(POLL_ITERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CREDENTIAL_REBUILD_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRET_FETCHES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRET_FETCH_DURATION.clone()))?;
    Ok(())
}

pub fn increment_poll_iterations() {
    POLL_ITERATIONS_TOTAL.inc();
}

pub fn increment_credential_rebuild_errors() {
    CREDENTIAL_REBUILD_ERRORS_TOTAL.inc();
}

/// Record one fetch attempt; `outcome` is one of `retrieved`, `missing`, `failed`, `timed_out`
pub fn record_secret_fetch(identity: &str, outcome: &str, duration_secs: f64) {
    SECRET_FETCHES_TOTAL
        .with_label_values(&[identity, outcome])
        .inc();
    SECRET_FETCH_DURATION.observe(duration_secs);
}
