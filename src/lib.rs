//! Key Vault Identity Demo Library
//!
//! Core functionality for the demo binary: configuration, credential selection,
//! the Key Vault client seam and the poll loop.

pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod provider;
pub mod runtime;

pub use config::{DemoConfig, IdentitySpec};
pub use error::{ConfigError, UnsupportedAuthMethod};
pub use provider::azure::{AuthMethod, CredentialStrategy};
