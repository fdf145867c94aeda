//! # Secret Poller
//!
//! Fixed-interval loop that fetches one secret with each configured identity.
//!
//! Every iteration:
//! 1. optionally rebuilds both identities (rebuild mode),
//! 2. opens one deadline shared by both fetches,
//! 3. fetches the secret with identity-1 then identity-2, logging each result,
//! 4. sleeps for the poll interval.
//!
//! Nothing inside an iteration is fatal. Errors are logged and the next tick retries.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};

use super::identity::{build_identities, Identity, PollContext};
use crate::config::DemoConfig;
use crate::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS};
use crate::observability::metrics;
use crate::provider::VaultClientFactory;

/// Loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Sleep between iterations
    pub interval: Duration,
    /// Deadline shared by all fetches of one iteration
    pub fetch_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

/// Result of one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The vault returned a value
    Retrieved(String),
    /// The vault answered without a value
    Missing,
    /// Transport, authentication or vault error
    Failed(String),
    /// Cancelled because the iteration deadline elapsed
    TimedOut,
}

impl FetchResult {
    /// Label used for the `outcome` metric dimension
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchResult::Retrieved(_) => "retrieved",
            FetchResult::Missing => "missing",
            FetchResult::Failed(_) => "failed",
            FetchResult::TimedOut => "timed_out",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Retrieved(_))
    }
}

/// Fetch attempt made by one identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub identity: String,
    pub client_id: String,
    pub result: FetchResult,
}

/// What happened during one iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Credentials could not be rebuilt; no fetch was attempted
    RebuildFailed(String),
    /// One outcome per identity, in fetch order
    Completed(Vec<FetchOutcome>),
}

impl IterationOutcome {
    pub fn fetches(&self) -> &[FetchOutcome] {
        match self {
            IterationOutcome::RebuildFailed(_) => &[],
            IterationOutcome::Completed(fetches) => fetches,
        }
    }
}

/// Polls the vault with both identities on a fixed interval
#[derive(Debug)]
pub struct SecretPoller<F> {
    config: DemoConfig,
    factory: F,
    settings: PollSettings,
}

impl<F: VaultClientFactory> SecretPoller<F> {
    pub fn new(config: DemoConfig, factory: F) -> Self {
        Self::with_settings(config, factory, PollSettings::default())
    }

    pub fn with_settings(config: DemoConfig, factory: F, settings: PollSettings) -> Self {
        Self {
            config,
            factory,
            settings,
        }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Build the context the loop starts from
    ///
    /// In rebuild mode the context starts empty and identities are created inside
    /// the loop. Otherwise both identities are built now.
    ///
    /// # Errors
    ///
    /// Returns an error (fatal at startup) if either identity cannot be built
    /// while rebuild mode is off.
    pub fn initial_context(&self) -> anyhow::Result<PollContext> {
        if self.config.rebuild_credentials {
            return Ok(PollContext::empty());
        }
        let identities = build_identities(
            self.config.auth_method,
            &self.config.identities,
            &self.factory,
        )?;
        Ok(PollContext::with_identities(identities))
    }

    /// Run iterations forever, sleeping `interval` between them
    pub async fn run(&self, ctx: &mut PollContext) {
        info!(
            "Starting secret retrieval loop (every {} seconds)...",
            self.settings.interval.as_secs()
        );
        loop {
            let span = info_span!(
                "keyvault.poll.iteration",
                auth_method = %self.config.auth_method,
                secret.name = %self.config.secret_name
            );
            self.poll_once(ctx).instrument(span).await;
            tokio::time::sleep(self.settings.interval).await;
        }
    }

    /// Run a single iteration without sleeping afterwards
    pub async fn poll_once(&self, ctx: &mut PollContext) -> IterationOutcome {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        info!("=== Iteration at {} ===", timestamp);
        metrics::increment_poll_iterations();

        if self.config.rebuild_credentials {
            // Drop the previous clients before building new ones
            ctx.clear();
            match build_identities(
                self.config.auth_method,
                &self.config.identities,
                &self.factory,
            ) {
                Ok(identities) => {
                    ctx.replace(identities);
                    info!("Rebuilt credentials for iteration");
                }
                Err(e) => {
                    let reason = format!("{e:#}");
                    error!(error = %reason, "Failed to rebuild credentials: {}", reason);
                    metrics::increment_credential_rebuild_errors();
                    return IterationOutcome::RebuildFailed(reason);
                }
            }
        }

        let Some(identities) = ctx.identities() else {
            warn!("No identities available, skipping iteration");
            return IterationOutcome::Completed(Vec::new());
        };

        let deadline = Instant::now() + self.settings.fetch_timeout;
        let mut fetches = Vec::with_capacity(identities.len());
        for identity in identities {
            fetches.push(self.fetch_secret(identity, deadline).await);
        }

        IterationOutcome::Completed(fetches)
    }

    async fn fetch_secret(&self, identity: &Identity, deadline: Instant) -> FetchOutcome {
        let secret_name = &self.config.secret_name;
        let start = Instant::now();

        let result = match tokio::time::timeout_at(
            deadline,
            identity.client().get_secret_value(secret_name),
        )
        .await
        {
            Ok(Ok(Some(value))) => {
                info!(
                    identity = %identity.name,
                    client_id = %identity.client_id,
                    "[{}] retrieved secret content \"{}\" from akv using mi client id \"{}\"",
                    self.config.auth_method,
                    value,
                    identity.client_id
                );
                FetchResult::Retrieved(value)
            }
            Ok(Ok(None)) => {
                error!(
                    identity = %identity.name,
                    client_id = %identity.client_id,
                    "Secret value is nil for {} (client ID: {})",
                    identity.name,
                    identity.client_id
                );
                FetchResult::Missing
            }
            Ok(Err(e)) => {
                let reason = format!("{e:#}");
                error!(
                    identity = %identity.name,
                    client_id = %identity.client_id,
                    error = %reason,
                    "Failed to get secret using {} (client ID: {}): {}",
                    identity.name,
                    identity.client_id,
                    reason
                );
                FetchResult::Failed(reason)
            }
            Err(_elapsed) => {
                error!(
                    identity = %identity.name,
                    client_id = %identity.client_id,
                    "Failed to get secret using {} (client ID: {}): iteration deadline of {}s elapsed",
                    identity.name,
                    identity.client_id,
                    self.settings.fetch_timeout.as_secs()
                );
                FetchResult::TimedOut
            }
        };

        metrics::record_secret_fetch(
            &identity.name,
            result.as_str(),
            start.elapsed().as_secs_f64(),
        );

        FetchOutcome {
            identity: identity.name.clone(),
            client_id: identity.client_id.clone(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentitySpec;
    use crate::provider::azure::AuthMethod;
    use crate::provider::SecretFetcher;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Fetcher that answers after a fixed delay
    #[derive(Debug)]
    struct SlowFetcher {
        delay: Duration,
        value: String,
    }

    #[async_trait]
    impl SecretFetcher for SlowFetcher {
        async fn get_secret_value(&self, _secret_name: &str) -> anyhow::Result<Option<String>> {
            tokio::time::sleep(self.delay).await;
            Ok(Some(self.value.clone()))
        }
    }

    struct SlowFactory {
        delay: Duration,
    }

    impl VaultClientFactory for SlowFactory {
        fn create(
            &self,
            _auth_method: AuthMethod,
            client_id: &str,
        ) -> anyhow::Result<Arc<dyn SecretFetcher>> {
            Ok(Arc::new(SlowFetcher {
                delay: self.delay,
                value: format!("value-for-{client_id}"),
            }))
        }
    }

    fn config() -> DemoConfig {
        DemoConfig {
            auth_method: AuthMethod::PodIdentity,
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
            rebuild_credentials: false,
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = PollSettings::default();
        assert_eq!(settings.interval, Duration::from_secs(30));
        assert_eq!(settings.fetch_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_fetch_result_labels() {
        assert_eq!(FetchResult::Retrieved("x".into()).as_str(), "retrieved");
        assert_eq!(FetchResult::Missing.as_str(), "missing");
        assert_eq!(FetchResult::Failed("boom".into()).as_str(), "failed");
        assert_eq!(FetchResult::TimedOut.as_str(), "timed_out");
        assert!(FetchResult::Retrieved(String::new()).is_success());
        assert!(!FetchResult::Missing.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_is_shared_across_identities() {
        // Each fetch alone fits in 15s, both together do not
        let poller = SecretPoller::new(
            config(),
            SlowFactory {
                delay: Duration::from_secs(10),
            },
        );
        let mut ctx = poller.initial_context().unwrap();

        let outcome = poller.poll_once(&mut ctx).await;
        let fetches = outcome.fetches();
        assert_eq!(fetches.len(), 2);
        assert_eq!(
            fetches[0].result,
            FetchResult::Retrieved("value-for-client-1".to_string())
        );
        assert_eq!(fetches[1].result, FetchResult::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_first_fetch_times_out_both() {
        let poller = SecretPoller::new(
            config(),
            SlowFactory {
                delay: Duration::from_secs(60),
            },
        );
        let mut ctx = poller.initial_context().unwrap();

        let started = Instant::now();
        let outcome = poller.poll_once(&mut ctx).await;
        assert!(started.elapsed() <= Duration::from_secs(16));
        assert!(outcome
            .fetches()
            .iter()
            .all(|f| f.result == FetchResult::TimedOut));
    }
}
