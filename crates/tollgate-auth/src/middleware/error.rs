//! HTTP error responses for [`AuthError`].
//!
//! Converts the error taxonomy into OAuth-style JSON bodies
//! (`{"error": ..., "error_description": ...}`): authentication
//! failures map to 401, validation to 400, store outage to 503, and
//! everything internal to 500.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = error_details(&self);
        let oauth_error = self.oauth_error_code();

        let body = json!({
            "error": oauth_error,
            "error_description": message,
        });

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let www_auth = format!(r#"Bearer error="{oauth_error}", error_description="{message}""#);
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// Maps an error to its HTTP status and caller-visible description.
///
/// Server-side faults get a fixed description; internal detail stays
/// in the logs.
fn error_details(error: &AuthError) -> (StatusCode, String) {
    match error {
        AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        }
        AuthError::TokenRevoked => (
            StatusCode::UNAUTHORIZED,
            "Token is revoked or not active".to_string(),
        ),
        AuthError::InvalidToken { message } => (StatusCode::UNAUTHORIZED, message.clone()),
        AuthError::InvalidRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AuthError::StoreUnavailable { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Revocation store unavailable, retry later".to_string(),
        ),
        AuthError::Storage { .. } | AuthError::Configuration { .. } | AuthError::Internal { .. } => {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}
