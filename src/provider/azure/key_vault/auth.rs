//! # Azure Key Vault Authentication
//!
//! Credential selection for the supported authentication methods.
//!
//! The tag → strategy mapping is an explicit match with one arm per tag.
//! `workload-identity` and `identity-binding` currently resolve to the same
//! credential type; they stay separate arms so that they can diverge independently.

use anyhow::{Context, Result};
use azure_core::credentials::TokenCredential;
use azure_identity::{
    ManagedIdentityCredential, ManagedIdentityCredentialOptions, UserAssignedId,
    WorkloadIdentityCredential, WorkloadIdentityCredentialOptions,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::error::UnsupportedAuthMethod;

/// Configured authentication method (`AUTH_METHOD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    /// AAD Pod Identity, served through the managed identity endpoint
    PodIdentity,
    /// AKS Workload Identity (federated service account token)
    WorkloadIdentity,
    /// AKS identity binding
    IdentityBinding,
}

impl AuthMethod {
    /// All supported methods, in documentation order
    pub const ALL: [AuthMethod; 3] = [
        AuthMethod::PodIdentity,
        AuthMethod::WorkloadIdentity,
        AuthMethod::IdentityBinding,
    ];

    /// Tag as it appears in `AUTH_METHOD` and in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::PodIdentity => "pod-identity",
            AuthMethod::WorkloadIdentity => "workload-identity",
            AuthMethod::IdentityBinding => "identity-binding",
        }
    }

    /// Credential type constructed for this method
    pub fn credential_strategy(&self) -> CredentialStrategy {
        match self {
            AuthMethod::PodIdentity => CredentialStrategy::ManagedIdentity,
            AuthMethod::WorkloadIdentity => CredentialStrategy::WorkloadIdentity,
            // TODO: confirm whether identity-binding should keep aliasing workload identity
            AuthMethod::IdentityBinding => CredentialStrategy::WorkloadIdentity,
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = UnsupportedAuthMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pod-identity" => Ok(AuthMethod::PodIdentity),
            "workload-identity" => Ok(AuthMethod::WorkloadIdentity),
            "identity-binding" => Ok(AuthMethod::IdentityBinding),
            other => Err(UnsupportedAuthMethod(other.to_string())),
        }
    }
}

/// Concrete Azure credential type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStrategy {
    /// `ManagedIdentityCredential` with a user-assigned client ID (IMDS)
    ManagedIdentity,
    /// `WorkloadIdentityCredential` using the projected service account token
    WorkloadIdentity,
}

/// Select the credential strategy for an `AUTH_METHOD` tag
///
/// # Errors
///
/// Returns [`UnsupportedAuthMethod`] naming the tag when it is not recognized.
pub fn select_credential_strategy(tag: &str) -> Result<CredentialStrategy, UnsupportedAuthMethod> {
    tag.parse::<AuthMethod>()
        .map(|method| method.credential_strategy())
}

/// Create an Azure credential for `client_id` using the strategy of `auth_method`
///
/// # Errors
///
/// Returns an error if the Azure SDK rejects the credential configuration
/// (e.g. workload identity environment not injected into the pod).
pub fn create_credential(
    auth_method: AuthMethod,
    client_id: &str,
) -> Result<Arc<dyn TokenCredential>> {
    let credential: Arc<dyn TokenCredential> = match auth_method.credential_strategy() {
        CredentialStrategy::ManagedIdentity => {
            debug!(
                auth_method = %auth_method,
                client_id = client_id,
                "Creating ManagedIdentityCredential"
            );
            let options = ManagedIdentityCredentialOptions {
                user_assigned_id: Some(UserAssignedId::ClientId(client_id.to_string())),
                ..Default::default()
            };
            ManagedIdentityCredential::new(Some(options))
                .context("Failed to create ManagedIdentityCredential")?
        }
        CredentialStrategy::WorkloadIdentity => {
            debug!(
                auth_method = %auth_method,
                client_id = client_id,
                "Creating WorkloadIdentityCredential"
            );
            let options = WorkloadIdentityCredentialOptions {
                client_id: Some(client_id.to_string()),
                ..Default::default()
            };
            WorkloadIdentityCredential::new(Some(options))
                .context("Failed to create WorkloadIdentityCredential")?
        }
    };

    Ok(credential)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_recognized_tags_select_a_strategy() {
        for tag in ["pod-identity", "workload-identity", "identity-binding"] {
            assert!(
                select_credential_strategy(tag).is_ok(),
                "tag {tag} should be supported"
            );
        }
    }

    #[test]
    fn test_routing_table() {
        assert_eq!(
            AuthMethod::PodIdentity.credential_strategy(),
            CredentialStrategy::ManagedIdentity
        );
        assert_eq!(
            AuthMethod::WorkloadIdentity.credential_strategy(),
            CredentialStrategy::WorkloadIdentity
        );
        assert_eq!(
            AuthMethod::IdentityBinding.credential_strategy(),
            CredentialStrategy::WorkloadIdentity
        );
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        for tag in ["", "Pod-Identity", "workload_identity", "msi", "identity-binding "] {
            let err = select_credential_strategy(tag).unwrap_err();
            assert_eq!(err, UnsupportedAuthMethod(tag.to_string()));
            assert!(err.to_string().contains("unsupported AUTH_METHOD"));
        }
    }

    #[test]
    fn test_display_round_trips_tag() {
        for method in AuthMethod::ALL {
            assert_eq!(method.to_string().parse::<AuthMethod>().unwrap(), method);
        }
    }
}
