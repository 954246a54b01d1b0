//! Server configuration loading.
//!
//! Configuration comes from a TOML file (path from `--config`, the
//! `TOLLGATE_CONFIG` environment variable, or `tollgate.toml`), with
//! the signing secret optionally overridden by `TOLLGATE_SIGNING_SECRET`
//! so it can stay out of the file entirely.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use tollgate_auth::config::AuthConfig;
use tollgate_auth::storage::client::OAuthClient;

/// Environment variable overriding `auth.signing.secret`.
pub const SIGNING_SECRET_ENV: &str = "TOLLGATE_SIGNING_SECRET";

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,

    /// Auth core configuration.
    pub auth: AuthConfig,

    /// Which revocation store backend to use.
    pub revocation: RevocationBackendConfig,

    /// OAuth clients seeded into the in-memory client directory.
    pub clients: Vec<OAuthClient>,

    /// Users seeded into the in-memory user directory.
    pub users: Vec<UserSeed>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            auth: AuthConfig::default(),
            revocation: RevocationBackendConfig::default(),
            clients: Vec::new(),
            users: Vec::new(),
        }
    }
}

/// Revocation store backend selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum RevocationBackendConfig {
    /// Single-process in-memory store (development and tests).
    Memory,

    /// Shared Redis store.
    Redis {
        /// Redis connection URL.
        url: String,

        /// Per-operation timeout.
        #[serde(
            default = "default_operation_timeout",
            with = "humantime_serde"
        )]
        operation_timeout: Duration,
    },
}

fn default_operation_timeout() -> Duration {
    Duration::from_millis(500)
}

impl Default for RevocationBackendConfig {
    fn default() -> Self {
        Self::Memory
    }
}

/// A seeded password user.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSeed {
    /// Login email.
    pub email: String,
    /// Plaintext password, hashed by the directory on load.
    pub password: String,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file could not be parsed.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Path that failed.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Loads configuration from `path`, applying environment overrides.
///
/// A missing file is not an error: defaults apply, which still fail
/// validation later unless the signing secret arrives via environment.
///
/// # Errors
///
/// Returns an error for an unreadable or unparseable file.
pub fn load_config(path: &str) -> Result<ServerConfig, ConfigLoadError> {
    let mut config = if Path::new(path).exists() {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigLoadError::Parse {
            path: path.to_string(),
            source,
        })?
    } else {
        ServerConfig::default()
    };

    if let Ok(secret) = std::env::var(SIGNING_SECRET_ENV) {
        if !secret.is_empty() {
            config.auth.signing.secret = secret;
        }
    }

    Ok(config)
}
