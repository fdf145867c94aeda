//! # Azure Key Vault Client
//!
//! Read-only client for the Azure Key Vault Secrets API.
//!
//! Credential selection lives in [`auth`], client construction in [`client`].

pub mod auth;
pub mod client;

use crate::provider::SecretFetcher;
use anyhow::Result;
use async_trait::async_trait;
use azure_security_keyvault_secrets::{models::Secret, SecretClient};
use std::time::Instant;
use tracing::{debug, Instrument};

/// Azure Key Vault client bound to one managed identity credential
pub struct AzureKeyVault {
    client: SecretClient,
    vault_url: String,
    client_id: String,
}

impl std::fmt::Debug for AzureKeyVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureKeyVault")
            .field("vault_url", &self.vault_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl AzureKeyVault {
    pub(crate) fn new(client: SecretClient, vault_url: String, client_id: String) -> Self {
        Self {
            client,
            vault_url,
            client_id,
        }
    }
}

#[async_trait]
impl SecretFetcher for AzureKeyVault {
    async fn get_secret_value(&self, secret_name: &str) -> Result<Option<String>> {
        let span = tracing::debug_span!(
            "azure.keyvault.secret.get",
            secret.name = secret_name,
            vault.url = %self.vault_url,
            identity.client_id = %self.client_id
        );
        let start = Instant::now();

        async move {
            // Latest version; no version parameter
            let response = self
                .client
                .get_secret(secret_name, None)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to get Azure secret {secret_name}: {e}"))?;

            let secret = serde_json::from_slice::<Secret>(&response.into_body()).map_err(|e| {
                anyhow::anyhow!("Failed to deserialize Azure secret response: {e}")
            })?;

            debug!(
                found = secret.value.is_some(),
                duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Azure secret request completed"
            );
            Ok(secret.value)
        }
        .instrument(span)
        .await
    }
}
