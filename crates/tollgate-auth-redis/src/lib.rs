//! Redis storage backend for tollgate-auth.
//!
//! Provides the shared [`RevocationStore`](tollgate_auth::RevocationStore)
//! used when multiple server instances must agree on token state.
//! Expiry is delegated to Redis's native per-key TTL, so no cleanup
//! job is needed.
//!
//! # Example
//!
//! ```ignore
//! use tollgate_auth_redis::RedisRevocationStore;
//!
//! let store = RedisRevocationStore::connect("redis://127.0.0.1/")?;
//! store.put_active(&token, expires_at).await?;
//! ```

pub mod revocation;

pub use revocation::RedisRevocationStore;
