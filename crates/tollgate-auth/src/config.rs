//! Authentication configuration.
//!
//! The configuration is built once at process start, validated, and
//! handed by value into the [`TokenSigner`](crate::token::TokenSigner)
//! and [`CredentialIssuer`](crate::token::CredentialIssuer)
//! constructors. Nothing reads configuration ambiently at request time.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// issuer = "https://auth.example.com"
/// audience = "https://api.example.com"
///
/// [auth.signing]
/// secret = "change-me-32-bytes-minimum......."
///
/// [auth.tokens]
/// user_token_ttl = "3h"
/// client_token_ttl = "1h"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Issuer URL (token `iss` claim).
    pub issuer: String,

    /// Audience URL (token `aud` claim).
    pub audience: String,

    /// Token signing configuration.
    pub signing: SigningConfig,

    /// Token lifetime policy.
    pub tokens: TokenPolicyConfig,

    /// External identity provider redirect targets for federated login.
    pub federation: FederationConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:8080".to_string(),
            audience: "http://localhost:8080".to_string(),
            signing: SigningConfig::default(),
            tokens: TokenPolicyConfig::default(),
            federation: FederationConfig::default(),
        }
    }
}

/// Token signing configuration.
///
/// Single shared symmetric key (HS256). There is deliberately no
/// default secret: an empty value fails [`AuthConfig::validate`] and
/// refuses startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Symmetric signing secret. Required; also settable via the
    /// `TOLLGATE_SIGNING_SECRET` environment variable at load time.
    pub secret: String,
}

/// Token lifetime policy.
///
/// Interactive user sessions get longer tokens than machine clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenPolicyConfig {
    /// Lifetime of tokens minted for user sessions (password or
    /// federated login).
    #[serde(with = "humantime_serde")]
    pub user_token_ttl: Duration,

    /// Lifetime of tokens minted through the client-credentials grant.
    #[serde(with = "humantime_serde")]
    pub client_token_ttl: Duration,
}

impl Default for TokenPolicyConfig {
    fn default() -> Self {
        Self {
            user_token_ttl: Duration::from_secs(3 * 3600),
            client_token_ttl: Duration::from_secs(3600),
        }
    }
}

/// Federated login configuration.
///
/// The provider handshake itself is external; this only records where
/// to send the browser for each named provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FederationConfig {
    /// Provider name -> redirect target.
    pub providers: HashMap<String, ProviderConfig>,
}

/// A single external identity provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Authorization URL the user agent is redirected to.
    pub authorize_url: String,
}

/// Errors raised by configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the signing secret is absent,
    /// and `ConfigError::InvalidValue` for empty issuer/audience or
    /// zero token lifetimes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing.secret.is_empty() {
            return Err(ConfigError::Missing(
                "auth.signing.secret (or TOLLGATE_SIGNING_SECRET)".to_string(),
            ));
        }

        if self.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "auth.issuer cannot be empty".to_string(),
            ));
        }

        if self.audience.is_empty() {
            return Err(ConfigError::InvalidValue(
                "auth.audience cannot be empty".to_string(),
            ));
        }

        if self.tokens.user_token_ttl.is_zero() || self.tokens.client_token_ttl.is_zero() {
            return Err(ConfigError::InvalidValue(
                "token lifetimes must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AuthConfig {
        AuthConfig {
            signing: SigningConfig {
                secret: "unit-test-secret".to_string(),
            },
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = AuthConfig::default();
        assert_eq!(cfg.tokens.user_token_ttl, Duration::from_secs(3 * 3600));
        assert_eq!(cfg.tokens.client_token_ttl, Duration::from_secs(3600));
        assert!(cfg.signing.secret.is_empty());
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let err = AuthConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_empty_issuer_rejected() {
        let mut cfg = valid_config();
        cfg.issuer.clear();
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidValue(_)
        ));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut cfg = valid_config();
        cfg.tokens.client_token_ttl = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml = r#"
            issuer = "https://auth.example.com"
            audience = "https://api.example.com"

            [signing]
            secret = "s3cret"

            [tokens]
            user_token_ttl = "3h"
            client_token_ttl = "1h"

            [federation.providers.google]
            authorize_url = "https://accounts.google.com/o/oauth2/v2/auth"
        "#;
        let cfg: AuthConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.issuer, "https://auth.example.com");
        assert_eq!(cfg.tokens.user_token_ttl, Duration::from_secs(3 * 3600));
        assert!(cfg.federation.providers.contains_key("google"));
        cfg.validate().unwrap();
    }
}
