//! Storage traits for token lifecycle data.
//!
//! This module defines the interfaces this crate consumes:
//!
//! - [`RevocationStore`] - active/revoked token state with per-key expiry
//! - [`UserDirectory`] - the external user credential collaborator
//! - [`ClientDirectory`] - the external OAuth client record collaborator
//!
//! In-memory implementations live in [`memory`]; the Redis-backed
//! revocation store lives in the `tollgate-auth-redis` crate.

pub mod client;
pub mod memory;
pub mod revocation;
pub mod user;

pub use client::{ClientDirectory, OAuthClient};
pub use memory::{MemoryClientDirectory, MemoryRevocationStore, MemoryUserDirectory};
pub use revocation::{MARKER_ACTIVE, MARKER_REVOKED, RevocationStore};
pub use user::{FederatedAssertion, User, UserDirectory};
