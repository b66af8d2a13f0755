//! Configuration module

use std::env;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Storage environment variables are not set ({0} missing)")]
    StorageMissing(&'static str),
}

/// Storage credentials. Both values are mandatory.
#[derive(Clone)]
pub struct StorageConfig {
    /// Database connection URL (without the privileged key)
    pub url: String,

    /// Privileged access key, applied as the database role password
    pub service_key: String,

    pub max_connections: u32,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("url", &redact_url(&self.url))
            .field("service_key", &"***")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Storage credentials, or why they are unusable
    pub storage: Result<StorageConfig, ConfigError>,

    /// Shared secret for the admin console gate
    pub admin_password: Option<String>,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            storage: StorageConfig::from_lookup(|key| env::var(key).ok()),

            admin_password: non_empty(env::var("ADMIN_PASSWORD").ok()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl StorageConfig {
    /// Build storage credentials from any key lookup. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_empty(lookup("STORAGE_URL"))
            .ok_or(ConfigError::StorageMissing("STORAGE_URL"))?;
        let service_key = non_empty(lookup("STORAGE_SERVICE_KEY"))
            .ok_or(ConfigError::StorageMissing("STORAGE_SERVICE_KEY"))?;

        let max_connections = lookup("STORAGE_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Ok(Self { url, service_key, max_connections })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Strip anything before `@` so credentials never reach the logs.
pub fn redact_url(url: &str) -> &str {
    url.rsplit('@').next().unwrap_or("***")
}
