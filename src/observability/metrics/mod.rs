//! # Metrics Module
//!
//! Prometheus metrics for the secret poll loop.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup and registration
//! - `poll_metrics` - Iteration, rebuild and secret fetch metrics

pub mod poll_metrics;
pub mod registry;

pub use poll_metrics::*;
pub use registry::*;
