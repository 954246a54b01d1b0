//! # tollgate-auth
//!
//! Token lifecycle core for Tollgate: signed-token minting, an
//! expiry-aware revocation ledger, and the per-request gate that
//! consults it.
//!
//! ## Overview
//!
//! Tokens are HS256-signed JWTs minted for two principal types: user
//! sessions (password or federated login) and machine clients
//! (client-credentials grant). Every issued token is registered
//! `active` in a revocation store under its own validity window before
//! it is handed to the caller; logout flips the marker to `revoked`
//! without extending that window. A lightweight middleware gate checks
//! the store on every tokened request and fails closed when the store
//! is unreachable.
//!
//! ## Modules
//!
//! - [`config`] - configuration structs, validated once at startup
//! - [`error`] - the [`AuthError`] taxonomy
//! - [`token`] - the signer and the credential issuance flows
//! - [`storage`] - revocation store and collaborator directory traits
//! - [`middleware`] - the revocation gate and error responses
//! - [`http`] - axum handlers for the auth endpoints

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod storage;
pub mod token;

pub use config::{AuthConfig, ConfigError, FederationConfig, TokenPolicyConfig};
pub use error::{AuthError, ErrorCategory};
pub use http::{AuthApiState, router};
pub use middleware::{GateState, bearer_token, revocation_gate};
pub use storage::{
    ClientDirectory, FederatedAssertion, MemoryClientDirectory, MemoryRevocationStore,
    MemoryUserDirectory, OAuthClient, RevocationStore, User, UserDirectory,
};
pub use token::{AccessTokenClaims, CredentialIssuer, IssuedToken, Principal, TokenSigner};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;
