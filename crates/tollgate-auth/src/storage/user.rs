//! User directory trait.
//!
//! The user store is an external collaborator: this crate only
//! consumes verification outcomes and never sees password material
//! beyond the verify call boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AuthResult;

/// A user principal, as returned by the directory after successful
/// authentication. Immutable for the duration of one token issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier.
    pub id: Uuid,

    /// Login identifier and `email` claim value.
    pub email: String,

    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// An externally-validated federated identity assertion.
///
/// By the time this reaches the issuer, the provider handshake has
/// already happened elsewhere; the fields here are trusted input.
#[derive(Debug, Clone, Deserialize)]
pub struct FederatedAssertion {
    /// Provider name (e.g. "google").
    pub provider: String,

    /// Provider-scoped subject identifier.
    pub subject: String,

    /// Email asserted by the provider.
    pub email: String,
}

/// Directory operations for user principals.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Verifies a password credential.
    ///
    /// Returns `Ok(None)` when the user is unknown or the password is
    /// wrong; the two cases are indistinguishable by design.
    ///
    /// # Errors
    ///
    /// Returns an error only for directory faults, never for bad
    /// credentials.
    async fn verify(&self, email: &str, password: &str) -> AuthResult<Option<User>>;

    /// Finds the local principal linked to a federated identity,
    /// creating one if no mapping exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory operation fails.
    async fn create_or_get_federated(&self, assertion: &FederatedAssertion) -> AuthResult<User>;

    /// Registers a new password-based user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidRequest`](crate::AuthError::InvalidRequest)
    /// when the email is already taken or the input is malformed.
    async fn register(&self, email: &str, password: &str) -> AuthResult<User>;
}
