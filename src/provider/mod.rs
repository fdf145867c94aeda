//! # Vault Provider
//!
//! Seams between the poll loop and the vault SDK.
//!
//! The poller only knows about [`SecretFetcher`] and [`VaultClientFactory`], so tests
//! can inject fake clients instead of talking to Azure.

pub mod azure;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use azure::AuthMethod;

/// A vault client bound to one credential
#[async_trait]
pub trait SecretFetcher: Send + Sync + std::fmt::Debug {
    /// Fetch the latest version of a secret
    ///
    /// Returns `Ok(None)` when the vault answered but the secret carries no value.
    async fn get_secret_value(&self, secret_name: &str) -> Result<Option<String>>;
}

/// Builds a vault client for one identity
pub trait VaultClientFactory: Send + Sync {
    /// Create a client authenticated as `client_id` using `auth_method`
    ///
    /// # Errors
    ///
    /// Returns an error if the credential or the client cannot be constructed.
    fn create(&self, auth_method: AuthMethod, client_id: &str) -> Result<Arc<dyn SecretFetcher>>;
}
