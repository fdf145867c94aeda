//! # Demo Configuration
//!
//! Process configuration loaded once at startup from environment variables.
//!
//! There are no CLI flags. Empty values are treated the same as unset ones.
//! Missing or invalid required variables are fatal.

mod server;

pub use server::ServerConfig;

use crate::constants::{DEFAULT_SECRET_NAME, IDENTITY_NAMES};
use crate::error::ConfigError;
use crate::provider::azure::AuthMethod;

/// A configured identity before any credential has been built for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySpec {
    /// Logical name used in log lines ("identity-1" / "identity-2")
    pub name: String,
    /// Managed identity client ID
    pub client_id: String,
}

/// Demo application configuration
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// How credentials are constructed for both identities
    pub auth_method: AuthMethod,
    /// Key Vault base URL (e.g. `https://my-vault.vault.azure.net/`)
    pub keyvault_url: String,
    /// Name of the secret fetched every iteration
    pub secret_name: String,
    /// The two identities, in fetch order
    pub identities: [IdentitySpec; 2],
    /// Discard and rebuild credentials at the start of every iteration
    pub rebuild_credentials: bool,
}

impl DemoConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or `AUTH_METHOD`
    /// is not a supported value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Validation order: `AUTH_METHOD`, `KEYVAULT_URL`, client IDs.
    ///
    /// # Errors
    ///
    /// See [`DemoConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let auth_method = non_empty("AUTH_METHOD")
            .ok_or(ConfigError::MissingAuthMethod)?
            .parse::<AuthMethod>()?;

        let keyvault_url =
            non_empty("KEYVAULT_URL").ok_or(ConfigError::MissingVar("KEYVAULT_URL"))?;

        let secret_name =
            non_empty("SECRET_NAME").unwrap_or_else(|| DEFAULT_SECRET_NAME.to_string());

        let (Some(client_id_1), Some(client_id_2)) = (
            non_empty("MANAGED_IDENTITY_1_CLIENT_ID"),
            non_empty("MANAGED_IDENTITY_2_CLIENT_ID"),
        ) else {
            return Err(ConfigError::MissingClientIds);
        };

        let rebuild_credentials = rebuild_enabled(lookup("REBUILD_CREDENTIALS").as_deref());

        Ok(Self {
            auth_method,
            keyvault_url,
            secret_name,
            identities: [
                IdentitySpec {
                    name: IDENTITY_NAMES[0].to_string(),
                    client_id: client_id_1,
                },
                IdentitySpec {
                    name: IDENTITY_NAMES[1].to_string(),
                    client_id: client_id_2,
                },
            ],
            rebuild_credentials,
        })
    }
}

/// Rebuild mode is on only for the exact value `"true"`
pub fn rebuild_enabled(value: Option<&str>) -> bool {
    value == Some("true")
}
