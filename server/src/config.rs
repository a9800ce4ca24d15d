//! Configuration management for the EventHub server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Logging verbosity is not configured here: the tracing filter reads
//! `RUST_LOG` directly when the subscriber is installed.

use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Persistence configuration.
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

/// Persistence configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory for the JSON file backend. When unset, state lives in
    /// memory and is lost on shutdown.
    pub data_dir: Option<PathBuf>,
    /// Whether to seed the sample catalog into an empty store on startup.
    pub seed: bool,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separated from the environment so the parsing is testable.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get("PORT").and_then(|s| s.parse().ok()).unwrap_or(8000),
            },
            storage: StorageConfig {
                data_dir: get("EVENTHUB_DATA_DIR").map(PathBuf::from),
                seed: get("EVENTHUB_SEED")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.storage.data_dir.is_none());
        assert!(!config.storage.seed);
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(|key| match key {
            "HOST" => Some("127.0.0.1".into()),
            "PORT" => Some("9100".into()),
            "EVENTHUB_DATA_DIR" => Some("/var/lib/eventhub".into()),
            "EVENTHUB_SEED" => Some("true".into()),
            _ => None,
        });
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(
            config.storage.data_dir,
            Some(PathBuf::from("/var/lib/eventhub"))
        );
        assert!(config.storage.seed);
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = Config::from_lookup(|key| match key {
            "PORT" => Some("not-a-port".into()),
            "EVENTHUB_SEED" => Some("yes".into()),
            _ => None,
        });
        assert_eq!(config.server.port, 8000);
        assert!(!config.storage.seed);
    }
}
