//! Configuration management for the remix engine
//!
//! Collaborator settings are loaded once at process start, from environment
//! variables or a TOML file, and passed into the components explicitly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::provider::ProviderConfig;
use crate::publisher::PublisherConfig;
use crate::watcher::WatcherConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Completion provider configuration
    pub provider: ProviderConfig,

    /// Publish API configuration
    pub publisher: PublisherConfig,

    /// Auto-publish watcher configuration
    pub watcher: WatcherConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber
    ///
    /// `RUST_LOG` overrides the configured level when set.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.clone()));

        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: ProviderConfig::from_env(),
            publisher: PublisherConfig::from_env(),
            watcher: WatcherConfig {
                interval_secs: std::env::var("WATCHER_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
                scan_on_start: std::env::var("WATCHER_SCAN_ON_START")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(true),
            },
            logging: LoggingConfig {
                level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;
        if self.publisher.base_url.trim().is_empty() {
            return Err(Error::config("publisher base_url cannot be empty"));
        }
        if self.watcher.interval_secs == 0 {
            return Err(Error::config("watcher interval must be at least 1 second"));
        }
        Ok(())
    }
}
