//! # Metrics Tests
//!
//! Checks the Prometheus text output after poll iterations. Kept in its own test
//! binary so the global registry is registered exactly once.

mod common;

use common::{demo_config, FakeFactory, FakeResponse};
use keyvault_identity_demo::observability::metrics::{gather_metrics, register_metrics};
use keyvault_identity_demo::runtime::SecretPoller;
use keyvault_identity_demo::AuthMethod;

#[tokio::test]
async fn test_poll_counters_exported() {
    register_metrics().unwrap();

    let factory = FakeFactory::new()
        .respond("client-1", FakeResponse::Value("hello".to_string()))
        .respond("client-2", FakeResponse::Error("Forbidden".to_string()));
    let poller = SecretPoller::new(demo_config(AuthMethod::WorkloadIdentity, false), factory);
    let mut ctx = poller.initial_context().unwrap();
    poller.poll_once(&mut ctx).await;
    poller.poll_once(&mut ctx).await;

    let failing = FakeFactory::new();
    failing.fail_next_builds(1);
    let rebuilding = SecretPoller::new(demo_config(AuthMethod::PodIdentity, true), failing);
    let mut rebuild_ctx = rebuilding.initial_context().unwrap();
    rebuilding.poll_once(&mut rebuild_ctx).await;

    let text = gather_metrics().unwrap();
    assert!(text.contains("keyvault_demo_poll_iterations_total 3"), "{text}");
    assert!(
        text.contains(
            r#"keyvault_demo_secret_fetches_total{identity="identity-1",outcome="retrieved"} 2"#
        ),
        "{text}"
    );
    assert!(
        text.contains(
            r#"keyvault_demo_secret_fetches_total{identity="identity-2",outcome="failed"} 2"#
        ),
        "{text}"
    );
    assert!(text.contains("keyvault_demo_credential_rebuild_errors_total 1"), "{text}");
    assert!(text.contains("keyvault_demo_secret_fetch_duration_seconds_count 4"), "{text}");
}
