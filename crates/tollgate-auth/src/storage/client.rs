//! OAuth client directory trait.
//!
//! Client registration and persistence live elsewhere; this crate
//! reads client records only to verify client-credentials grants.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AuthResult;

/// A registered machine client, consumed read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthClient {
    /// Human-readable client name.
    pub name: String,

    /// OAuth client identifier.
    pub client_id: String,

    /// Shared client secret.
    pub client_secret: String,

    /// Scopes this client may be granted. Minted tokens carry exactly
    /// this list in their `scope` claim.
    pub allowed_scopes: Vec<String>,
}

impl OAuthClient {
    /// Returns the allowed scopes as a space-separated claim value.
    #[must_use]
    pub fn scope_claim(&self) -> String {
        self.allowed_scopes.join(" ")
    }
}

/// Lookup operations for registered OAuth clients.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Finds a client by its OAuth client_id.
    ///
    /// Returns `None` if the client is not registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<OAuthClient>>;
}
