//! # Observability
//!
//! Tracing setup, Prometheus metrics and the health/metrics HTTP server.

pub mod logging;
pub mod metrics;
pub mod server;
