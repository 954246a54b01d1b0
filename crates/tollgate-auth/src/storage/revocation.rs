//! Revocation store trait.
//!
//! Tracks the active/revoked state of issued tokens, keyed by the
//! opaque token string. Every issued token is registered `active` with
//! a TTL equal to its remaining validity; logout flips the marker to
//! `revoked` without extending that TTL. A key that is absent (never
//! issued, or expired out of the backend) reads the same as an
//! inactive one.
//!
//! The store is keyed by the full token string rather than the `jti`
//! claim because the enforcement gate must answer without decoding the
//! JWT.
//!
//! # Implementations
//!
//! - [`MemoryRevocationStore`](crate::storage::MemoryRevocationStore)
//!   in this crate (single process, tests and development)
//! - `RedisRevocationStore` in the `tollgate-auth-redis` crate
//!   (shared across instances, native per-key TTL)

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::AuthResult;

/// Marker value stored for a token that has been issued and not revoked.
pub const MARKER_ACTIVE: &str = "active";

/// Marker value stored for a token that was explicitly revoked before
/// its natural expiry.
pub const MARKER_REVOKED: &str = "revoked";

/// Storage for token revocation state.
///
/// All operations are single-key and idempotent; no cross-key ordering
/// is guaranteed or required. Implementations must be safe for
/// concurrent use from many request handlers.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Registers a token as active until `expires_at`.
    ///
    /// The entry's TTL is `expires_at - now`. When that is zero or
    /// negative the call is a no-op: an already-expired token needs no
    /// tracking.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreUnavailable`](crate::AuthError::StoreUnavailable)
    /// when the backend cannot be reached or times out.
    async fn put_active(&self, token: &str, expires_at: OffsetDateTime) -> AuthResult<()>;

    /// Returns `true` only if the stored marker for `token` is
    /// [`MARKER_ACTIVE`].
    ///
    /// Absent keys yield `false`. The result says nothing about *why*
    /// a token is inactive (revoked vs expired vs never issued).
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be reached; callers on
    /// the enforcement path must treat that as a denial.
    async fn is_active(&self, token: &str) -> AuthResult<bool>;

    /// Sets the stored marker for `token` to [`MARKER_REVOKED`],
    /// preserving the key's remaining TTL.
    ///
    /// Revoking a token whose entry has already expired (or was never
    /// registered) is a no-op; `is_active` is already `false` for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn revoke(&self, token: &str) -> AuthResult<()>;
}
