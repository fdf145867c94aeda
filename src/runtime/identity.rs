//! # Identities
//!
//! The pair of identities polled every iteration and the context that owns them.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::IdentitySpec;
use crate::provider::azure::AuthMethod;
use crate::provider::{SecretFetcher, VaultClientFactory};

/// A named managed identity with its vault client
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub client_id: String,
    client: Arc<dyn SecretFetcher>,
}

impl Identity {
    pub fn new(
        name: impl Into<String>,
        client_id: impl Into<String>,
        client: Arc<dyn SecretFetcher>,
    ) -> Self {
        Self {
            name: name.into(),
            client_id: client_id.into(),
            client,
        }
    }

    pub fn client(&self) -> &dyn SecretFetcher {
        self.client.as_ref()
    }
}

/// Mutable poll state passed explicitly into every iteration
///
/// Holds both identities, or nothing while rebuild mode has not yet produced a
/// usable pair. Replacing or clearing the pair drops the previous clients.
#[derive(Debug, Default)]
pub struct PollContext {
    identities: Option<[Identity; 2]>,
}

impl PollContext {
    /// Context for rebuild mode, where identities are created inside the loop
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_identities(identities: [Identity; 2]) -> Self {
        Self {
            identities: Some(identities),
        }
    }

    pub fn identities(&self) -> Option<&[Identity; 2]> {
        self.identities.as_ref()
    }

    pub(crate) fn replace(&mut self, identities: [Identity; 2]) {
        self.identities = Some(identities);
    }

    pub(crate) fn clear(&mut self) {
        self.identities = None;
    }
}

/// Build both identities in order, failing on the first one that cannot be set up
///
/// # Errors
///
/// Returns the factory error annotated with the identity name and client ID.
pub fn build_identities<F>(
    auth_method: AuthMethod,
    specs: &[IdentitySpec; 2],
    factory: &F,
) -> Result<[Identity; 2]>
where
    F: VaultClientFactory + ?Sized,
{
    let first = build_identity(auth_method, &specs[0], factory)?;
    let second = build_identity(auth_method, &specs[1], factory)?;
    Ok([first, second])
}

fn build_identity<F>(
    auth_method: AuthMethod,
    spec: &IdentitySpec,
    factory: &F,
) -> Result<Identity>
where
    F: VaultClientFactory + ?Sized,
{
    let client = factory.create(auth_method, &spec.client_id).with_context(|| {
        format!(
            "Failed to set up {} (client ID: {})",
            spec.name, spec.client_id
        )
    })?;
    Ok(Identity::new(spec.name.clone(), spec.client_id.clone(), client))
}
