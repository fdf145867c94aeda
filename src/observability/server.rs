//! # Health and Metrics Server
//!
//! Optional HTTP server exposing:
//! - `GET /metrics` - Prometheus text format
//! - `GET /healthz` - liveness, always `ok`
//! - `GET /readyz` - readiness, `ok` once the poll loop has started

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::observability::metrics;

/// State shared between the poll loop and the health handlers
#[derive(Debug, Default)]
pub struct ServerState {
    /// Set once the listener is bound and serving
    pub is_serving: AtomicBool,
    /// Set once the poll loop has started
    pub is_ready: AtomicBool,
}

impl ServerState {
    pub fn mark_ready(&self) {
        self.is_ready.store(true, Ordering::Relaxed);
    }
}

/// Build the health router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn metrics_handler() -> impl IntoResponse {
    match metrics::gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    if state.is_ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

/// Bind and serve the health router until the process exits
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn start_server(port: u16, state: Arc<ServerState>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind health server to {addr}"))?;

    info!("Health server listening on {}", addr);
    state.is_serving.store(true, Ordering::Relaxed);

    axum::serve(listener, router(Arc::clone(&state)))
        .await
        .context("Health server terminated")
}

/// Spawn the health server and wait until it is serving
///
/// # Errors
///
/// Returns an error if the server task exits early or does not come up within
/// the configured startup timeout.
pub async fn spawn_server(port: u16, config: &ServerConfig) -> Result<Arc<ServerState>> {
    let state = Arc::new(ServerState::default());
    let server_state = Arc::clone(&state);
    let handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, server_state).await {
            error!("HTTP server error: {:#}", e);
        }
    });

    let startup_timeout = Duration::from_secs(config.startup_timeout_secs);
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let start_time = Instant::now();

    loop {
        if handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if state.is_serving.load(Ordering::Relaxed) {
            info!("HTTP server is ready and accepting connections");
            return Ok(state);
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow::anyhow!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}
