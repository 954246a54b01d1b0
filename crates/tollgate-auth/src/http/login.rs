//! Registration and password login handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;
use crate::token::signer::IssuedToken;

use super::AuthApiState;

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email, used as the login identifier.
    pub email: String,
    /// Plaintext password, consumed by the user directory only.
    pub password: String,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The new principal's stable identifier.
    pub id: Uuid,
    /// The registered email.
    pub email: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login identifier.
    pub email: String,
    /// Password credential.
    pub password: String,
}

/// `POST /auth/register`
pub async fn register_handler(
    State(state): State<AuthApiState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    let user = state.users.register(&request.email, &request.password).await?;
    debug!(email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// `POST /auth/login`
///
/// On success the returned token is already registered active in the
/// revocation store.
pub async fn login_handler(
    State(state): State<AuthApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<IssuedToken>, AuthError> {
    let issued = state
        .issuer
        .password_login(&request.email, &request.password)
        .await?;
    Ok(Json(issued))
}
