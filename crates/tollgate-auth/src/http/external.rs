//! Federated login handlers.
//!
//! The provider handshake is entirely external. `GET /auth/external-login`
//! only redirects the user agent at the configured provider; the
//! callback consumes the assertion the external layer validated and
//! turns it into a local session token.

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::AuthError;
use crate::storage::user::FederatedAssertion;
use crate::token::signer::IssuedToken;

use super::AuthApiState;

/// Query parameters for `GET /auth/external-login`.
#[derive(Debug, Deserialize)]
pub struct ExternalLoginParams {
    /// Name of the configured provider to log in with.
    pub provider: String,
}

/// `GET /auth/external-login?provider=...`
pub async fn external_login_handler(
    State(state): State<AuthApiState>,
    Query(params): Query<ExternalLoginParams>,
) -> Result<Redirect, AuthError> {
    let provider = state
        .federation
        .providers
        .get(&params.provider)
        .ok_or_else(|| {
            AuthError::invalid_request(format!("unknown provider: {}", params.provider))
        })?;
    debug!(provider = %params.provider, "redirecting to external provider");
    Ok(Redirect::temporary(&provider.authorize_url))
}

/// `GET /auth/external-login-callback`
///
/// Receives the externally-validated assertion as query parameters and
/// completes the federated flow.
pub async fn external_login_callback_handler(
    State(state): State<AuthApiState>,
    Query(assertion): Query<FederatedAssertion>,
) -> Result<Json<IssuedToken>, AuthError> {
    let issued = state.issuer.federated_login(&assertion).await?;
    Ok(Json(issued))
}
