//! Logout handler.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;

use crate::error::AuthError;
use crate::middleware::gate::bearer_token;

use super::AuthApiState;

/// Response body for a successful logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Always true; revocation is idempotent.
    pub revoked: bool,
}

/// `POST /auth/logout`
///
/// Unlike the revocation gate, this endpoint requires a bearer token:
/// there is nothing to revoke without one, so absence is a 400.
pub async fn logout_handler(
    State(state): State<AuthApiState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AuthError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AuthError::invalid_request("missing bearer token"))?;
    state.issuer.logout(&token).await?;
    Ok(Json(LogoutResponse { revoked: true }))
}
