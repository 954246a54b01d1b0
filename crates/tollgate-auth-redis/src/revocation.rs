//! Redis-backed revocation store.
//!
//! Key scheme: the opaque token string maps to `"active"` or
//! `"revoked"`. Registration sets the key with `EX` equal to the
//! token's remaining validity; revocation rewrites the value with
//! `SET .. XX KEEPTTL`, which atomically preserves the remaining TTL
//! and no-ops when the key has already expired. Redis evicts expired
//! keys on its own, so absence and natural expiry look identical, as
//! the trait requires.
//!
//! Every operation is bounded by a short timeout. Timeouts and
//! connection failures surface as
//! [`AuthError::StoreUnavailable`](tollgate_auth::AuthError), which the
//! enforcement gate converts into a denial.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use time::OffsetDateTime;
use tracing::debug;

use tollgate_auth::storage::revocation::{MARKER_ACTIVE, MARKER_REVOKED, RevocationStore};
use tollgate_auth::{AuthError, AuthResult};

/// Default per-operation timeout.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(500);

/// Revocation store over a Redis connection pool.
pub struct RedisRevocationStore {
    pool: Pool,
    operation_timeout: Duration,
}

/// Remaining TTL in whole seconds, rounded up to at least one second
/// for entries that are still live. `None` means the token is already
/// expired and needs no tracking.
fn remaining_ttl_secs(expires_at: OffsetDateTime, now: OffsetDateTime) -> Option<u64> {
    let remaining = expires_at - now;
    if remaining.is_positive() {
        // Round up so the store entry never lapses before the signed expiry.
        let secs = (remaining.whole_milliseconds() + 999) / 1000;
        Some(secs as u64)
    } else {
        None
    }
}

impl RedisRevocationStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Creates a pool from a Redis URL and wraps it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the URL is invalid or the
    /// pool cannot be constructed. Connectivity is not probed here;
    /// the first operation will report an unreachable backend.
    pub fn connect(url: &str) -> AuthResult<Self> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AuthError::configuration(format!("invalid redis configuration: {e}")))?;
        Ok(Self::new(pool))
    }

    /// Overrides the per-operation timeout.
    #[must_use]
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Runs a store operation under the configured timeout.
    async fn bounded<F, T>(&self, operation: F) -> AuthResult<T>
    where
        F: Future<Output = Result<T, redis::RedisError>>,
    {
        match tokio::time::timeout(self.operation_timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AuthError::store_unavailable(e.to_string())),
            Err(_) => Err(AuthError::store_unavailable(format!(
                "operation timed out after {:?}",
                self.operation_timeout
            ))),
        }
    }

    async fn connection(&self) -> AuthResult<deadpool_redis::Connection> {
        match tokio::time::timeout(self.operation_timeout, self.pool.get()).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(AuthError::store_unavailable(e.to_string())),
            Err(_) => Err(AuthError::store_unavailable(
                "timed out acquiring redis connection",
            )),
        }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn put_active(&self, token: &str, expires_at: OffsetDateTime) -> AuthResult<()> {
        let Some(ttl_secs) = remaining_ttl_secs(expires_at, OffsetDateTime::now_utc()) else {
            return Ok(());
        };
        let mut conn = self.connection().await?;
        self.bounded(conn.set_ex::<_, _, ()>(token, MARKER_ACTIVE, ttl_secs))
            .await?;
        debug!(ttl_secs, "registered token as active");
        Ok(())
    }

    async fn is_active(&self, token: &str) -> AuthResult<bool> {
        let mut conn = self.connection().await?;
        let value: Option<String> = self.bounded(conn.get(token)).await?;
        Ok(value.as_deref() == Some(MARKER_ACTIVE))
    }

    async fn revoke(&self, token: &str) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        // XX: only touch keys that still exist; KEEPTTL: the revoked
        // marker inherits the remaining lifetime instead of living
        // forever.
        let result: Option<String> = self
            .bounded(
                redis::cmd("SET")
                    .arg(token)
                    .arg(MARKER_REVOKED)
                    .arg("XX")
                    .arg("KEEPTTL")
                    .query_async(&mut conn),
            )
            .await?;
        debug!(updated = result.is_some(), "revocation marker written");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration as TimeDuration;

    #[test]
    fn test_remaining_ttl_for_live_token() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(
            remaining_ttl_secs(now + TimeDuration::seconds(90), now),
            Some(90)
        );
        assert_eq!(
            remaining_ttl_secs(now + TimeDuration::hours(3), now),
            Some(3 * 3600)
        );
    }

    #[test]
    fn test_sub_second_remainder_rounds_up() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(
            remaining_ttl_secs(now + TimeDuration::milliseconds(250), now),
            Some(1)
        );
        assert_eq!(
            remaining_ttl_secs(now + TimeDuration::milliseconds(90_400), now),
            Some(91)
        );
    }

    #[test]
    fn test_expired_token_needs_no_tracking() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(remaining_ttl_secs(now, now), None);
        assert_eq!(remaining_ttl_secs(now - TimeDuration::seconds(1), now), None);
    }

    #[test]
    fn test_connect_rejects_malformed_url() {
        assert!(RedisRevocationStore::connect("not a url").is_err());
    }
}
