//! In-memory storage backends.
//!
//! Single-process implementations of the storage traits, used by the
//! test suite and as the default development backend. All durable
//! state in a deployed system belongs in the Redis backend instead.

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::storage::client::{ClientDirectory, OAuthClient};
use crate::storage::revocation::RevocationStore;
use crate::storage::user::{FederatedAssertion, User, UserDirectory};

// =============================================================================
// Revocation Store
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Active,
    Revoked,
}

#[derive(Debug, Clone)]
struct RevocationEntry {
    marker: Marker,
    expires_at: OffsetDateTime,
}

/// In-memory revocation store with per-entry expiry.
///
/// Expiry is evaluated lazily on read against the supplied clock
/// value; there is no background sweeper. `revoke` keeps the entry's
/// original `expires_at`, so a revoked marker lapses exactly when the
/// token would have.
#[derive(Debug, Default)]
pub struct MemoryRevocationStore {
    entries: DashMap<String, RevocationEntry>,
}

impl MemoryRevocationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`RevocationStore::is_active`] but evaluated at an
    /// explicit instant. Tests use this to cross TTL boundaries
    /// without sleeping.
    pub fn is_active_at(&self, token: &str, now: OffsetDateTime) -> bool {
        match self.entries.get(token) {
            Some(entry) => entry.marker == Marker::Active && entry.expires_at > now,
            None => false,
        }
    }

    /// Number of live (unexpired) entries, for store inspection in tests.
    pub fn live_entries(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        self.entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .count()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn put_active(&self, token: &str, expires_at: OffsetDateTime) -> AuthResult<()> {
        if expires_at <= OffsetDateTime::now_utc() {
            return Ok(());
        }
        self.entries.insert(
            token.to_string(),
            RevocationEntry {
                marker: Marker::Active,
                expires_at,
            },
        );
        Ok(())
    }

    async fn is_active(&self, token: &str) -> AuthResult<bool> {
        Ok(self.is_active_at(token, OffsetDateTime::now_utc()))
    }

    async fn revoke(&self, token: &str) -> AuthResult<()> {
        // Keep the original expires_at: the revoked marker must not
        // outlive the token's natural lifetime.
        if let Some(mut entry) = self.entries.get_mut(token) {
            entry.marker = Marker::Revoked;
        }
        Ok(())
    }
}

// =============================================================================
// User Directory
// =============================================================================

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_digest: [u8; 32],
}

fn digest(input: &str) -> [u8; 32] {
    Sha256::digest(input.as_bytes()).into()
}

/// In-memory user directory keyed by email.
///
/// Passwords are stored as SHA-256 digests; a production directory
/// would sit behind the same trait with proper password hashing.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: DashMap<String, StoredUser>,
    // "provider:subject" -> email
    federated_links: DashMap<String, String>,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user, replacing any existing entry with the same email.
    #[must_use]
    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.users.insert(
            email.to_string(),
            StoredUser {
                user: User {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    display_name: None,
                },
                password_digest: digest(password),
            },
        );
        self
    }

    fn link_key(assertion: &FederatedAssertion) -> String {
        format!("{}:{}", assertion.provider, assertion.subject)
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn verify(&self, email: &str, password: &str) -> AuthResult<Option<User>> {
        Ok(self.users.get(email).and_then(|stored| {
            // Digest comparison keeps the check length-independent.
            if stored.password_digest == digest(password) {
                Some(stored.user.clone())
            } else {
                None
            }
        }))
    }

    async fn create_or_get_federated(&self, assertion: &FederatedAssertion) -> AuthResult<User> {
        let key = Self::link_key(assertion);
        if let Some(email) = self.federated_links.get(&key) {
            if let Some(stored) = self.users.get(email.value()) {
                return Ok(stored.user.clone());
            }
        }

        // No local mapping yet: create the principal and link it.
        let user = match self.users.get(&assertion.email) {
            Some(stored) => stored.user.clone(),
            None => {
                let user = User {
                    id: Uuid::new_v4(),
                    email: assertion.email.clone(),
                    display_name: None,
                };
                self.users.insert(
                    assertion.email.clone(),
                    StoredUser {
                        user: user.clone(),
                        // Federated accounts have no local password.
                        password_digest: digest(&Uuid::new_v4().to_string()),
                    },
                );
                user
            }
        };
        self.federated_links.insert(key, assertion.email.clone());
        Ok(user)
    }

    async fn register(&self, email: &str, password: &str) -> AuthResult<User> {
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::invalid_request("invalid email address"));
        }
        if password.len() < 8 {
            return Err(AuthError::invalid_request(
                "password must be at least 8 characters",
            ));
        }
        if self.users.contains_key(email) {
            return Err(AuthError::invalid_request("email is already registered"));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            display_name: None,
        };
        self.users.insert(
            email.to_string(),
            StoredUser {
                user: user.clone(),
                password_digest: digest(password),
            },
        );
        Ok(user)
    }
}

// =============================================================================
// Client Directory
// =============================================================================

/// In-memory client directory, seeded at construction.
#[derive(Debug, Default)]
pub struct MemoryClientDirectory {
    clients: DashMap<String, OAuthClient>,
}

impl MemoryClientDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a client record.
    #[must_use]
    pub fn with_client(self, client: OAuthClient) -> Self {
        self.clients.insert(client.client_id.clone(), client);
        self
    }
}

#[async_trait]
impl ClientDirectory for MemoryClientDirectory {
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<OAuthClient>> {
        Ok(self.clients.get(client_id).map(|c| c.clone()))
    }
}

// =============================================================================
// Tests
// =============================================================================
