//! Credential issuance flows.
//!
//! Three entry flows share one shape: authenticate a principal through
//! its external collaborator, mint a signed token, register it active
//! in the revocation store, and only then hand it back. The ordering
//! is the contract: a caller can never hold a token the store does not
//! know about.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::AuthResult;
use crate::config::TokenPolicyConfig;
use crate::error::AuthError;
use crate::storage::client::ClientDirectory;
use crate::storage::revocation::RevocationStore;
use crate::storage::user::{FederatedAssertion, UserDirectory};
use crate::token::signer::{IssuedToken, Principal, TokenSigner};

/// Issues, registers, and revokes bearer tokens.
pub struct CredentialIssuer {
    signer: TokenSigner,
    users: Arc<dyn UserDirectory>,
    clients: Arc<dyn ClientDirectory>,
    revocations: Arc<dyn RevocationStore>,
    policy: TokenPolicyConfig,
}

/// Compares two secrets without leaking where they diverge.
///
/// Hashing both sides first makes the comparison run over fixed-length
/// digests, so its timing is independent of the presented secret.
fn secrets_match(presented: &str, stored: &str) -> bool {
    let a: [u8; 32] = Sha256::digest(presented.as_bytes()).into();
    let b: [u8; 32] = Sha256::digest(stored.as_bytes()).into();
    a == b
}

impl CredentialIssuer {
    /// Creates a new issuer.
    #[must_use]
    pub fn new(
        signer: TokenSigner,
        users: Arc<dyn UserDirectory>,
        clients: Arc<dyn ClientDirectory>,
        revocations: Arc<dyn RevocationStore>,
        policy: TokenPolicyConfig,
    ) -> Self {
        Self {
            signer,
            users,
            clients,
            revocations,
            policy,
        }
    }

    /// Password login flow.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a failed verify; no
    /// token is minted and no store write happens in that case.
    pub async fn password_login(&self, email: &str, password: &str) -> AuthResult<IssuedToken> {
        let user = self
            .users
            .verify(email, password)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "password verification failed");
                AuthError::InvalidCredentials
            })?;

        self.issue(Principal::User(user), self.policy.user_token_ttl)
            .await
    }

    /// Federated login flow.
    ///
    /// The provider handshake already happened upstream; this consumes
    /// the validated assertion, resolves or creates the local
    /// principal, and proceeds like a successful password login.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or store operation fails.
    pub async fn federated_login(&self, assertion: &FederatedAssertion) -> AuthResult<IssuedToken> {
        let user = self.users.create_or_get_federated(assertion).await?;
        info!(provider = %assertion.provider, email = %user.email, "federated principal resolved");
        self.issue(Principal::User(user), self.policy.user_token_ttl)
            .await
    }

    /// Client-credentials flow.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown client id
    /// or a wrong secret; the two are indistinguishable to the caller
    /// and neither writes to the store.
    pub async fn client_credentials(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> AuthResult<IssuedToken> {
        let client = self.clients.find_by_client_id(client_id).await?;

        // Unknown id and wrong secret take the same path out.
        let client = match client {
            Some(client) if secrets_match(client_secret, &client.client_secret) => client,
            _ => {
                warn!(client_id = %client_id, "client authentication failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.issue(Principal::Client(client), self.policy.client_token_ttl)
            .await
    }

    /// Revokes a token.
    ///
    /// Idempotent; revoking an expired or unknown token succeeds
    /// quietly, since it is already not active.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached. That is a
    /// transient failure: the caller should retry, because the token
    /// is still live.
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        self.revocations.revoke(token).await?;
        info!("token revoked");
        Ok(())
    }

    /// Mints and registers in one step; the store write completes
    /// before the token escapes this function.
    async fn issue(
        &self,
        principal: Principal,
        ttl: std::time::Duration,
    ) -> AuthResult<IssuedToken> {
        let issued = self.signer.mint(&principal, ttl)?;
        self.revocations
            .put_active(&issued.token, issued.expires_at)
            .await?;
        info!(
            subject = %principal.subject(),
            expires_at = %issued.expires_at,
            "token issued"
        );
        Ok(issued)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, SigningConfig};
    use crate::storage::client::OAuthClient;
    use crate::storage::memory::{
        MemoryClientDirectory, MemoryRevocationStore, MemoryUserDirectory,
    };
    use crate::token::signer::PrincipalType;

    fn build_issuer(
        users: MemoryUserDirectory,
        clients: MemoryClientDirectory,
    ) -> (CredentialIssuer, Arc<MemoryRevocationStore>, TokenSigner) {
        let config = AuthConfig {
            issuer: "https://auth.test".to_string(),
            audience: "https://api.test".to_string(),
            signing: SigningConfig {
                secret: "issuer-test-secret".to_string(),
            },
            ..AuthConfig::default()
        };
        let store = Arc::new(MemoryRevocationStore::new());
        let issuer = CredentialIssuer::new(
            TokenSigner::new(&config).unwrap(),
            Arc::new(users),
            Arc::new(clients),
            store.clone(),
            config.tokens.clone(),
        );
        // A second signer with the same secret, for decoding in assertions.
        let decoder = TokenSigner::new(&AuthConfig {
            issuer: "https://auth.test".to_string(),
            audience: "https://api.test".to_string(),
            signing: SigningConfig {
                secret: "issuer-test-secret".to_string(),
            },
            ..AuthConfig::default()
        })
        .unwrap();
        (issuer, store, decoder)
    }

    fn seeded_clients() -> MemoryClientDirectory {
        MemoryClientDirectory::new().with_client(OAuthClient {
            name: "reporting".to_string(),
            client_id: "report-bot".to_string(),
            client_secret: "hunter2hunter2".to_string(),
            allowed_scopes: vec!["read:reports".to_string(), "write:reports".to_string()],
        })
    }

    #[tokio::test]
    async fn test_password_login_registers_before_returning() {
        let users = MemoryUserDirectory::new().with_user("alice@example.com", "correct horse");
        let (issuer, store, _) = build_issuer(users, MemoryClientDirectory::new());

        let issued = issuer
            .password_login("alice@example.com", "correct horse")
            .await
            .unwrap();
        assert!(store.is_active(&issued.token).await.unwrap());
    }

    #[tokio::test]
    async fn test_password_login_failure_writes_nothing() {
        let users = MemoryUserDirectory::new().with_user("alice@example.com", "correct horse");
        let (issuer, store, _) = build_issuer(users, MemoryClientDirectory::new());

        let err = issuer
            .password_login("alice@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(store.live_entries(), 0);
    }

    #[tokio::test]
    async fn test_user_token_ttl_is_three_hours() {
        let users = MemoryUserDirectory::new().with_user("alice@example.com", "correct horse");
        let (issuer, _, decoder) = build_issuer(users, MemoryClientDirectory::new());

        let issued = issuer
            .password_login("alice@example.com", "correct horse")
            .await
            .unwrap();
        let claims = decoder.decode(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3 * 3600);
    }

    #[tokio::test]
    async fn test_client_credentials_scope_claim_matches_allowed_scopes() {
        let (issuer, store, decoder) = build_issuer(MemoryUserDirectory::new(), seeded_clients());

        let issued = issuer
            .client_credentials("report-bot", "hunter2hunter2")
            .await
            .unwrap();
        let claims = decoder.decode(&issued.token).unwrap();

        assert_eq!(claims.prt, PrincipalType::Client);
        assert_eq!(claims.sub, "report-bot");
        assert_eq!(claims.scope.as_deref(), Some("read:reports write:reports"));
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(store.is_active(&issued.token).await.unwrap());
    }

    #[tokio::test]
    async fn test_client_credentials_wrong_secret_writes_nothing() {
        let (issuer, store, _) = build_issuer(MemoryUserDirectory::new(), seeded_clients());

        let err = issuer
            .client_credentials("report-bot", "wrong-secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(store.live_entries(), 0);
    }

    #[tokio::test]
    async fn test_unknown_client_and_wrong_secret_are_indistinguishable() {
        let (issuer, _, _) = build_issuer(MemoryUserDirectory::new(), seeded_clients());

        let unknown = issuer
            .client_credentials("no-such-client", "whatever")
            .await
            .unwrap_err();
        let wrong = issuer
            .client_credentials("report-bot", "whatever")
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_federated_login_mints_user_token() {
        let (issuer, store, decoder) =
            build_issuer(MemoryUserDirectory::new(), MemoryClientDirectory::new());

        let assertion = FederatedAssertion {
            provider: "google".to_string(),
            subject: "g-42".to_string(),
            email: "erin@example.com".to_string(),
        };
        let issued = issuer.federated_login(&assertion).await.unwrap();
        let claims = decoder.decode(&issued.token).unwrap();

        assert_eq!(claims.prt, PrincipalType::User);
        assert_eq!(claims.email.as_deref(), Some("erin@example.com"));
        assert!(store.is_active(&issued.token).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_then_reissue_scenario() {
        let users = MemoryUserDirectory::new().with_user("alice@example.com", "correct horse");
        let (issuer, store, _) = build_issuer(users, MemoryClientDirectory::new());

        let a = issuer
            .password_login("alice@example.com", "correct horse")
            .await
            .unwrap();
        assert!(store.is_active(&a.token).await.unwrap());

        issuer.logout(&a.token).await.unwrap();
        assert!(!store.is_active(&a.token).await.unwrap());

        let b = issuer
            .password_login("alice@example.com", "correct horse")
            .await
            .unwrap();
        assert_ne!(a.token, b.token);
        assert!(store.is_active(&b.token).await.unwrap());
        // A stays revoked.
        assert!(!store.is_active(&a.token).await.unwrap());
    }

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("hunter2", "hunter2"));
        assert!(!secrets_match("hunter2", "hunter3"));
        assert!(!secrets_match("", "hunter2"));
        assert!(!secrets_match("hunter2longer", "hunter2"));
    }
}
