//! # Azure Provider
//!
//! Azure Key Vault access through managed-identity credentials.

pub mod key_vault;

pub use key_vault::auth::{
    create_credential, select_credential_strategy, AuthMethod, CredentialStrategy,
};
pub use key_vault::client::KeyVaultClientFactory;
pub use key_vault::AzureKeyVault;
