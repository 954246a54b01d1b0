//! Axum HTTP handlers for the auth endpoints.
//!
//! The surface is thin by design: each handler authenticates through
//! the [`CredentialIssuer`](crate::token::CredentialIssuer) or the
//! user directory and maps the outcome to a response. All policy lives
//! below this layer.

pub mod external;
pub mod login;
pub mod logout;
pub mod token;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::FederationConfig;
use crate::storage::user::UserDirectory;
use crate::token::issuer::CredentialIssuer;

pub use external::{external_login_callback_handler, external_login_handler};
pub use login::{login_handler, register_handler};
pub use logout::logout_handler;
pub use token::token_handler;

/// Shared state for the auth endpoints.
#[derive(Clone)]
pub struct AuthApiState {
    /// Issues and revokes tokens.
    pub issuer: Arc<CredentialIssuer>,
    /// User directory, used directly by registration.
    pub users: Arc<dyn UserDirectory>,
    /// Federated provider redirect targets.
    pub federation: FederationConfig,
}

/// Builds the `/auth` router.
pub fn router(state: AuthApiState) -> Router {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/external-login", get(external_login_handler))
        .route(
            "/auth/external-login-callback",
            get(external_login_callback_handler),
        )
        .route("/auth/token", post(token_handler))
        .route("/auth/logout", post(logout_handler))
        .with_state(state)
}

// =============================================================================
// Tests
// =============================================================================
