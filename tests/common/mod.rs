//! Shared test doubles for the vault client seam.

#![allow(dead_code, reason = "Not every test binary uses every helper")]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use keyvault_identity_demo::provider::{SecretFetcher, VaultClientFactory};
use keyvault_identity_demo::{AuthMethod, DemoConfig, IdentitySpec};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted vault answer for one client ID
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Value(String),
    Nil,
    Error(String),
}

#[derive(Debug)]
struct FakeFetcher {
    response: FakeResponse,
    fetches: Arc<AtomicUsize>,
}

#[async_trait]
impl SecretFetcher for FakeFetcher {
    async fn get_secret_value(&self, _secret_name: &str) -> Result<Option<String>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            FakeResponse::Value(value) => Ok(Some(value.clone())),
            FakeResponse::Nil => Ok(None),
            FakeResponse::Error(message) => Err(anyhow!("{message}")),
        }
    }
}

/// Factory handing out fake clients and counting builds/fetches
#[derive(Debug, Clone, Default)]
pub struct FakeFactory {
    responses: Arc<Mutex<HashMap<String, FakeResponse>>>,
    failing_builds: Arc<AtomicUsize>,
    builds: Arc<AtomicUsize>,
    fetches: Arc<AtomicUsize>,
    methods: Arc<Mutex<Vec<AuthMethod>>>,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, client_id: &str, response: FakeResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(client_id.to_string(), response);
        self
    }

    /// Make the next `count` client constructions fail
    pub fn fail_next_builds(&self, count: usize) {
        self.failing_builds.store(count, Ordering::SeqCst);
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn methods(&self) -> Vec<AuthMethod> {
        self.methods.lock().unwrap().clone()
    }
}

impl VaultClientFactory for FakeFactory {
    fn create(&self, auth_method: AuthMethod, client_id: &str) -> Result<Arc<dyn SecretFetcher>> {
        let remaining = self.failing_builds.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_builds.store(remaining - 1, Ordering::SeqCst);
            return Err(anyhow!("credential unavailable for {client_id}"));
        }

        self.builds.fetch_add(1, Ordering::SeqCst);
        self.methods.lock().unwrap().push(auth_method);
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(client_id)
            .cloned()
            .unwrap_or_else(|| FakeResponse::Error("SecretNotFound".to_string()));

        Ok(Arc::new(FakeFetcher {
            response,
            fetches: Arc::clone(&self.fetches),
        }))
    }
}

pub fn demo_config(auth_method: AuthMethod, rebuild_credentials: bool) -> DemoConfig {
    DemoConfig {
        auth_method,
        keyvault_url: "https://example.vault".to_string(),
        secret_name: "demo-secret".to_string(),
        identities: [
            IdentitySpec {
                name: "identity-1".to_string(),
                client_id: "client-1".to_string(),
            },
            IdentitySpec {
                name: "identity-2".to_string(),
                client_id: "client-2".to_string(),
            },
        ],
        rebuild_credentials,
    }
}
