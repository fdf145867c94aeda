//! # Key Vault Identity Demo
//!
//! Periodically fetches a secret from Azure Key Vault with two managed identities
//! and logs the outcome.
//!
//! ## Authentication methods
//!
//! Selected with `AUTH_METHOD`:
//!
//! - **pod-identity** - `ManagedIdentityCredential` with a user-assigned client ID
//! - **workload-identity** - `WorkloadIdentityCredential` (federated service account token)
//! - **identity-binding** - same credential as workload-identity
//!
//! ## Usage
//!
//! All configuration comes from environment variables; see the README.

use anyhow::{Context, Result};
use keyvault_identity_demo::runtime::{initialize, InitializationResult};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let InitializationResult {
        poller,
        mut context,
        server_state,
    } = match initialize().await {
        Ok(result) => result,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            return Err(e);
        }
    };

    if let Some(state) = &server_state {
        state.mark_ready();
    }

    tokio::select! {
        () = poller.run(&mut context) => {}
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received, stopping secret retrieval loop");
        }
    }

    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on unix
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.context("Failed to listen for SIGINT")?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;
    }

    Ok(())
}
