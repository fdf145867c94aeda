//! # Error Types
//!
//! Typed errors for startup configuration. Anything raised here is fatal:
//! the process refuses to start and exits non-zero.

use thiserror::Error;

/// Authentication method tag that is not one of the supported values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported AUTH_METHOD: {0}. Supported values: pod-identity, workload-identity, identity-binding")]
pub struct UnsupportedAuthMethod(pub String);

/// Configuration error raised while reading the process environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AUTH_METHOD environment variable is not set. Supported values: pod-identity, workload-identity, identity-binding")]
    MissingAuthMethod,

    #[error("Invalid AUTH_METHOD: {0}")]
    InvalidAuthMethod(#[from] UnsupportedAuthMethod),

    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),

    #[error("Both MANAGED_IDENTITY_1_CLIENT_ID and MANAGED_IDENTITY_2_CLIENT_ID environment variables must be set")]
    MissingClientIds,
}
