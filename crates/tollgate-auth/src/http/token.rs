//! Client-credentials token endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::debug;

use crate::error::AuthError;
use crate::token::signer::IssuedToken;

use super::AuthApiState;

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct ClientTokenRequest {
    /// OAuth client identifier.
    pub client_id: String,
    /// Shared client secret.
    pub client_secret: String,
}

/// `POST /auth/token`
///
/// Client-credentials grant. The minted token carries the client's
/// allowed scopes; a bad id or secret yields one undifferentiated 401.
pub async fn token_handler(
    State(state): State<AuthApiState>,
    Json(request): Json<ClientTokenRequest>,
) -> Result<Json<IssuedToken>, AuthError> {
    debug!(client_id = %request.client_id, "processing client-credentials request");
    let issued = state
        .issuer
        .client_credentials(&request.client_id, &request.client_secret)
        .await?;
    Ok(Json(issued))
}
