//! Layered server configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. TOML file (`--config <path>`, else `./incident-portal.toml` if present)
//! 3. Environment variables prefixed with `INCIDENT_PORTAL_`, e.g. `INCIDENT_PORTAL_PORT=8080`

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "incident-portal.toml";
pub const ENV_PREFIX: &str = "INCIDENT_PORTAL_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Load the four sample incidents at startup.
    pub seed_sample_data: bool,
    /// Fallback filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Fixes the AI confidence sequence for reproducible runs.
    pub confidence_seed: Option<u64>,
    pub cors_permissive: bool,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            seed_sample_data: true,
            log_level: "info".into(),
            confidence_seed: None,
            cors_permissive: true,
            request_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_file {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        }
        let config: Self = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "host",
                reason: "must not be empty".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
