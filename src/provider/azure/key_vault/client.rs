//! # Azure Key Vault Client Creation
//!
//! Builds one `SecretClient` per identity from the selected credential.

use anyhow::{Context, Result};
use azure_security_keyvault_secrets::SecretClient;
use std::sync::Arc;
use tracing::debug;

use super::auth::{create_credential, AuthMethod};
use super::AzureKeyVault;
use crate::provider::{SecretFetcher, VaultClientFactory};

/// Creates Azure Key Vault clients for a fixed vault URL
#[derive(Debug, Clone)]
pub struct KeyVaultClientFactory {
    vault_url: String,
}

impl KeyVaultClientFactory {
    pub fn new(vault_url: impl Into<String>) -> Self {
        Self {
            vault_url: vault_url.into(),
        }
    }
}

impl VaultClientFactory for KeyVaultClientFactory {
    fn create(&self, auth_method: AuthMethod, client_id: &str) -> Result<Arc<dyn SecretFetcher>> {
        let credential = create_credential(auth_method, client_id)
            .with_context(|| format!("Failed to create {auth_method} credential"))?;

        let client = SecretClient::new(&self.vault_url, credential, None)
            .context("Failed to create Azure Key Vault SecretClient")?;

        debug!(
            vault.url = %self.vault_url,
            client_id = client_id,
            "Created Azure Key Vault client"
        );

        Ok(Arc::new(AzureKeyVault::new(
            client,
            self.vault_url.clone(),
            client_id.to_string(),
        )))
    }
}
