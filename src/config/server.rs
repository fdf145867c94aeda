//! # Server Configuration
//!
//! Health/metrics HTTP server settings loaded from environment variables.

/// HTTP server configuration
///
/// The server is only started when `METRICS_PORT` holds a valid port.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server port for metrics and health checks
    pub metrics_port: Option<u16>,
    /// Server startup timeout (seconds)
    /// How long to wait for server to be ready before giving up
    pub startup_timeout_secs: u64,
    /// Server readiness poll interval (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        use crate::constants::{
            DEFAULT_SERVER_POLL_INTERVAL_MS, DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
        };
        Self {
            metrics_port: None,
            startup_timeout_secs: DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_SERVER_POLL_INTERVAL_MS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            metrics_port: lookup("METRICS_PORT").and_then(|v| v.parse().ok()),
            startup_timeout_secs: parse_or_default(
                lookup("SERVER_STARTUP_TIMEOUT_SECS"),
                defaults.startup_timeout_secs,
            ),
            poll_interval_ms: parse_or_default(
                lookup("SERVER_POLL_INTERVAL_MS"),
                defaults.poll_interval_ms,
            ),
        }
    }
}

/// Parse an optional value or return the default
fn parse_or_default<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_disabled_without_port() {
        let config = ServerConfig::from_lookup(|_| None);
        assert!(config.metrics_port.is_none());
        assert_eq!(config.startup_timeout_secs, 10);
        assert_eq!(config.poll_interval_ms, 50);
    }

    #[test]
    fn test_invalid_port_disables_server() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "METRICS_PORT").then(|| "not-a-port".to_string())
        });
        assert!(config.metrics_port.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "METRICS_PORT" => Some("9090".to_string()),
            "SERVER_STARTUP_TIMEOUT_SECS" => Some("3".to_string()),
            "SERVER_POLL_INTERVAL_MS" => Some("garbage".to_string()),
            _ => None,
        });
        assert_eq!(config.metrics_port, Some(9090));
        assert_eq!(config.startup_timeout_secs, 3);
        assert_eq!(config.poll_interval_ms, 50);
    }
}
