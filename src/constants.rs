//! # Constants
//!
//! Default values shared across configuration, the poll loop and the health server.

/// Secret fetched when `SECRET_NAME` is not set
pub const DEFAULT_SECRET_NAME: &str = "demo-secret";

/// Seconds between poll iterations
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Deadline shared by all fetches of a single iteration (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Logical names of the two polled identities, in fetch order
pub const IDENTITY_NAMES: [&str; 2] = ["identity-1", "identity-2"];

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "keyvault_identity_demo=info";

/// Server startup timeout (seconds)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Server readiness poll interval (milliseconds)
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;
