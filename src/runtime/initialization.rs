//! # Initialization
//!
//! Startup logic: tracing, rustls setup, configuration, metrics, the optional
//! health server and the initial identities.
//!
//! Every error returned from here is fatal and terminates the process.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{DemoConfig, ServerConfig};
use crate::observability;
use crate::observability::server::ServerState;
use crate::provider::azure::KeyVaultClientFactory;
use crate::runtime::identity::PollContext;
use crate::runtime::poller::SecretPoller;

/// Initialization result containing everything the poll loop needs
#[derive(Debug)]
pub struct InitializationResult {
    /// Poller bound to the real Azure Key Vault client factory
    pub poller: SecretPoller<KeyVaultClientFactory>,
    /// Initial poll context (empty in rebuild mode)
    pub context: PollContext,
    /// Health server state, when `METRICS_PORT` is set
    pub server_state: Option<Arc<ServerState>>,
}

/// Initialize the demo runtime
///
/// Configuration is validated before any client is built, so a missing
/// `KEYVAULT_URL` fails here without touching the network.
///
/// # Errors
///
/// Returns an error on invalid configuration, metrics registration failure,
/// health server startup failure, or (when rebuild mode is off) failure to build
/// the initial identities.
pub async fn initialize() -> Result<InitializationResult> {
    observability::logging::init_tracing();

    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    info!("Starting Azure Key Vault demo application...");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    let config = DemoConfig::from_env().context("Invalid configuration")?;
    let server_config = ServerConfig::from_env();

    observability::metrics::register_metrics()?;

    let server_state = match server_config.metrics_port {
        Some(port) => Some(observability::server::spawn_server(port, &server_config).await?),
        None => {
            debug!("METRICS_PORT not set, health server disabled");
            None
        }
    };

    let factory = KeyVaultClientFactory::new(config.keyvault_url.clone());
    let poller = SecretPoller::new(config, factory);
    let context = poller
        .initial_context()
        .context("Failed to create initial Key Vault clients")?;

    log_configuration_summary(poller.config());

    Ok(InitializationResult {
        poller,
        context,
        server_state,
    })
}

/// Log the effective configuration once at startup
pub fn log_configuration_summary(config: &DemoConfig) {
    info!("Authentication method: {}", config.auth_method);
    info!("Configured to use Key Vault: {}", config.keyvault_url);
    info!("Secret name: {}", config.secret_name);
    info!("Identity 1 Client ID: {}", config.identities[0].client_id);
    info!("Identity 2 Client ID: {}", config.identities[1].client_id);
    info!(
        "Rebuild credentials every run: {}",
        config.rebuild_credentials
    );
}
