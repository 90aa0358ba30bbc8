//! # Atrium Config
//!
//! Environment-driven configuration with validation at boot.
//!
//! Misconfiguration is fatal: a process that cannot decrypt its credential
//! records or reach its tuple store should fail at startup, not per-call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod secrets;

pub use secrets::{EnvSecretSource, MemorySecretSource, SecretSource};

use atrium_const::MIN_ENCRYPTION_SECRET_LEN;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which tuple store backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-memory backend, for development and tests.
    Memory,
    /// HTTP transport to the external authorization service.
    Http,
}

/// Tuple store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Base URL of the authorization service (required for `Http`).
    pub endpoint: Option<String>,
    /// Authorization model id, if one was already published.
    pub model_id: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Credential vault settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Secret the AEAD key is derived from. Never logged.
    #[serde(skip_serializing)]
    pub encryption_secret: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// One of `pretty`, `compact`, `json`.
    pub format: String,
    /// Optional env-filter directive, e.g. `info,atrium=debug`.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub vault: VaultConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvSecretSource)
    }

    /// Load configuration from an arbitrary secret source (tests use
    /// [`MemorySecretSource`]).
    pub fn from_source(source: &dyn SecretSource) -> Result<Self, ConfigError> {
        let backend = match source.get("ATRIUM_STORE_BACKEND").as_deref() {
            None | Some("http") => StoreBackend::Http,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid(format!(
                    "ATRIUM_STORE_BACKEND must be 'http' or 'memory', got '{other}'"
                )))
            }
        };

        let timeout_secs = match source.get("ATRIUM_STORE_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("ATRIUM_STORE_TIMEOUT_SECS '{raw}' is not a number"))
            })?,
            None => 5,
        };

        let config = Self {
            store: StoreConfig {
                backend,
                endpoint: source.get("ATRIUM_STORE_ENDPOINT"),
                model_id: source.get("ATRIUM_STORE_MODEL_ID"),
                timeout_secs,
            },
            vault: VaultConfig {
                encryption_secret: source
                    .get("ATRIUM_ENCRYPTION_SECRET")
                    .ok_or_else(|| ConfigError::Missing("ATRIUM_ENCRYPTION_SECRET".into()))?,
            },
            server: ServerConfig {
                listen_addr: source
                    .get("ATRIUM_LISTEN_ADDR")
                    .unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            },
            log: LogConfig {
                format: source.get("ATRIUM_LOG_FORMAT").unwrap_or_else(|| "compact".to_string()),
                filter: source.get("ATRIUM_LOG_FILTER"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field invariants. Called by [`Config::from_source`];
    /// also callable on hand-built configs in tests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vault.encryption_secret.len() < MIN_ENCRYPTION_SECRET_LEN {
            return Err(ConfigError::Invalid(format!(
                "ATRIUM_ENCRYPTION_SECRET must be at least {MIN_ENCRYPTION_SECRET_LEN} characters"
            )));
        }
        if self.store.backend == StoreBackend::Http && self.store.endpoint.is_none() {
            return Err(ConfigError::Missing(
                "ATRIUM_STORE_ENDPOINT (required for the http backend)".into(),
            ));
        }
        if self.store.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "ATRIUM_STORE_TIMEOUT_SECS must be positive".into(),
            ));
        }
        match self.log.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "ATRIUM_LOG_FORMAT must be pretty, compact, or json, got '{other}'"
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_source() -> MemorySecretSource {
        MemorySecretSource::new()
            .with("ATRIUM_STORE_BACKEND", "memory")
            .with(
                "ATRIUM_ENCRYPTION_SECRET",
                "an-encryption-secret-of-sufficient-length",
            )
    }

    #[test]
    fn test_loads_with_defaults() {
        let config = Config::from_source(&valid_source()).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.timeout_secs, 5);
        assert_eq!(config.server.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.log.format, "compact");
    }

    #[test]
    fn test_short_secret_is_fatal() {
        let source = MemorySecretSource::new()
            .with("ATRIUM_STORE_BACKEND", "memory")
            .with("ATRIUM_ENCRYPTION_SECRET", "too-short");
        let err = Config::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let source = MemorySecretSource::new().with("ATRIUM_STORE_BACKEND", "memory");
        let err = Config::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_http_backend_requires_endpoint() {
        let source = valid_source().with("ATRIUM_STORE_BACKEND", "http");
        let err = Config::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));

        let source = valid_source()
            .with("ATRIUM_STORE_BACKEND", "http")
            .with("ATRIUM_STORE_ENDPOINT", "http://localhost:8081");
        let config = Config::from_source(&source).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Http);
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let source = valid_source().with("ATRIUM_LOG_FORMAT", "fancy");
        assert!(Config::from_source(&source).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let source = valid_source().with("ATRIUM_STORE_TIMEOUT_SECS", "0");
        assert!(Config::from_source(&source).is_err());
    }
}
