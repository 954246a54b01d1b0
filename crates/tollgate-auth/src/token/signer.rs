//! Signed-token minting and verification.
//!
//! The signer is a pure component: claims plus a TTL in, a signed
//! token string plus its expiry out. It performs no I/O and writes
//! nothing; registering the result with the revocation store is the
//! issuer's job.
//!
//! Signing uses a single shared HS256 secret. A missing secret is a
//! construction-time failure, so a misconfigured process refuses to
//! start instead of failing on its first login.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::config::{AuthConfig, ConfigError};
use crate::error::AuthError;
use crate::storage::client::OAuthClient;
use crate::storage::user::User;

// =============================================================================
// Claims
// =============================================================================

/// Which kind of principal a token was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalType {
    /// An interactive user session.
    User,
    /// A machine client (client-credentials grant).
    Client,
}

/// The claim set carried by every minted token.
///
/// Tamper-evident: any mutation of these fields invalidates the HS256
/// signature. The fresh `jti` per mint makes token strings globally
/// unique even for identical principal and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// Subject: user id or client id.
    pub sub: String,

    /// Unique token identifier, fresh per mint.
    pub jti: String,

    /// Principal type.
    pub prt: PrincipalType,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// User email (user tokens only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Space-separated granted scopes (client tokens only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// The principal a token is minted for.
#[derive(Debug, Clone)]
pub enum Principal {
    /// A verified user session.
    User(User),
    /// A verified machine client.
    Client(OAuthClient),
}

impl Principal {
    /// The `sub` claim value for this principal.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::User(user) => user.email.as_str(),
            Self::Client(client) => client.client_id.as_str(),
        }
    }
}

/// A freshly minted token together with its expiry.
///
/// The expiry is returned alongside the string so the caller can
/// register the token with the revocation store under exactly the
/// same validity window that was signed into it.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    /// The signed token string.
    pub token: String,

    /// When the token expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

// =============================================================================
// Signer
// =============================================================================

/// Mints and verifies HS256-signed bearer tokens.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenSigner {
    /// Creates a signer from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the signing secret is empty.
    /// This is the startup-time invariant: no signer, no server.
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        if config.signing.secret.is_empty() {
            return Err(ConfigError::Missing(
                "auth.signing.secret (or TOLLGATE_SIGNING_SECRET)".to_string(),
            ));
        }
        let secret = config.signing.secret.as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// Mints a token for `principal` valid for `ttl` from now.
    ///
    /// User tokens carry an `email` claim; client tokens carry the
    /// client's allowed scopes in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn mint(&self, principal: &Principal, ttl: std::time::Duration) -> AuthResult<IssuedToken> {
        let iat = OffsetDateTime::now_utc().unix_timestamp();
        let exp = iat + ttl.as_secs() as i64;

        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: principal.subject().to_string(),
            jti: Uuid::new_v4().to_string(),
            prt: match principal {
                Principal::User(_) => PrincipalType::User,
                Principal::Client(_) => PrincipalType::Client,
            },
            iat,
            exp,
            email: match principal {
                Principal::User(user) => Some(user.email.clone()),
                Principal::Client(_) => None,
            },
            scope: match principal {
                Principal::User(_) => None,
                Principal::Client(client) => Some(client.scope_claim()),
            },
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("failed to encode token: {e}")))?;

        let expires_at = OffsetDateTime::from_unix_timestamp(exp)
            .map_err(|e| AuthError::internal(format!("invalid expiry timestamp: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Decodes a token and validates its signature, expiry, issuer and
    /// audience.
    ///
    /// The revocation gate does not call this; full validation is a
    /// separate check that runs wherever claims are actually trusted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any signature, expiry, or
    /// claim mismatch.
    pub fn decode(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::invalid_token(e.to_string()))
    }

    /// Returns the configured issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SigningConfig;

    fn signer() -> TokenSigner {
        let config = AuthConfig {
            issuer: "https://auth.test".to_string(),
            audience: "https://api.test".to_string(),
            signing: SigningConfig {
                secret: "unit-test-signing-secret".to_string(),
            },
            ..AuthConfig::default()
        };
        TokenSigner::new(&config).unwrap()
    }

    fn alice() -> Principal {
        Principal::User(User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            display_name: None,
        })
    }

    fn report_bot() -> Principal {
        Principal::Client(OAuthClient {
            name: "reporting".to_string(),
            client_id: "report-bot".to_string(),
            client_secret: "irrelevant-here".to_string(),
            allowed_scopes: vec!["read:reports".to_string(), "write:reports".to_string()],
        })
    }

    #[test]
    fn test_missing_secret_fails_construction() {
        assert!(matches!(
            TokenSigner::new(&AuthConfig::default()),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_mint_user_token_round_trip() {
        let signer = signer();
        let ttl = std::time::Duration::from_secs(3 * 3600);

        let issued = signer.mint(&alice(), ttl).unwrap();
        let claims = signer.decode(&issued.token).unwrap();

        assert_eq!(claims.iss, "https://auth.test");
        assert_eq!(claims.aud, "https://api.test");
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.prt, PrincipalType::User);
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert!(claims.scope.is_none());
        assert_eq!(claims.exp, issued.expires_at.unix_timestamp());
        assert_eq!(claims.exp - claims.iat, 3 * 3600);
    }

    #[test]
    fn test_mint_client_token_carries_exact_scopes() {
        let signer = signer();
        let issued = signer
            .mint(&report_bot(), std::time::Duration::from_secs(3600))
            .unwrap();
        let claims = signer.decode(&issued.token).unwrap();

        assert_eq!(claims.sub, "report-bot");
        assert_eq!(claims.prt, PrincipalType::Client);
        assert_eq!(claims.scope.as_deref(), Some("read:reports write:reports"));
        assert!(claims.email.is_none());
    }

    #[test]
    fn test_token_strings_are_unique_per_mint() {
        let signer = signer();
        let ttl = std::time::Duration::from_secs(3600);
        let a = signer.mint(&alice(), ttl).unwrap();
        let b = signer.mint(&alice(), ttl).unwrap();
        assert_ne!(a.token, b.token);

        let ja = signer.decode(&a.token).unwrap().jti;
        let jb = signer.decode(&b.token).unwrap().jti;
        assert_ne!(ja, jb);
    }

    #[test]
    fn test_token_shape_is_three_segments() {
        let signer = signer();
        let issued = signer
            .mint(&alice(), std::time::Duration::from_secs(60))
            .unwrap();
        assert_eq!(issued.token.split('.').count(), 3);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let signer = signer();
        let issued = signer
            .mint(&alice(), std::time::Duration::from_secs(3600))
            .unwrap();

        // Flip a character inside the payload segment.
        let mut parts: Vec<String> = issued.token.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[4] = if payload[4] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(signer.decode(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let signer = signer();
        let other = TokenSigner::new(&AuthConfig {
            issuer: "https://auth.test".to_string(),
            audience: "https://api.test".to_string(),
            signing: SigningConfig {
                secret: "a-different-secret".to_string(),
            },
            ..AuthConfig::default()
        })
        .unwrap();

        let issued = signer
            .mint(&alice(), std::time::Duration::from_secs(3600))
            .unwrap();
        assert!(other.decode(&issued.token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let signer = signer();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = AccessTokenClaims {
            iss: "https://auth.test".to_string(),
            aud: "https://api.test".to_string(),
            sub: "alice@example.com".to_string(),
            jti: Uuid::new_v4().to_string(),
            prt: PrincipalType::User,
            iat: now - 7200,
            exp: now - 3600,
            email: Some("alice@example.com".to_string()),
            scope: None,
        };
        let stale = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-signing-secret"),
        )
        .unwrap();

        assert!(signer.decode(&stale).is_err());
    }
}
