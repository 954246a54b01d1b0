//! Revocation gate middleware.
//!
//! Runs once per inbound request, ahead of endpoint authorization. It
//! answers one question from the revocation store: has this bearer
//! token been revoked (or expired out of the store)? It deliberately
//! does not verify the token's signature or claims; that belongs to
//! whatever consumes the claims downstream. A request without a bearer
//! token passes through untouched for downstream layers to judge.
//!
//! When the store cannot be reached the gate fails closed: the request
//! is denied rather than waved past a possibly-revoked token.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::storage::revocation::RevocationStore;

/// State for the revocation gate.
#[derive(Clone)]
pub struct GateState {
    /// Revocation store consulted on every tokened request.
    pub revocations: Arc<dyn RevocationStore>,
}

impl GateState {
    /// Creates gate state over a revocation store.
    #[must_use]
    pub fn new(revocations: Arc<dyn RevocationStore>) -> Self {
        Self { revocations }
    }
}

/// Extracts a bearer token from the `Authorization` header.
///
/// Returns `None` for a missing header, a non-bearer scheme, or an
/// empty token.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

/// Middleware entry point; layer with
/// `axum::middleware::from_fn_with_state(gate_state, revocation_gate)`.
pub async fn revocation_gate(
    State(state): State<GateState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        // Unauthenticated requests are not this layer's problem.
        return next.run(request).await;
    };

    match state.revocations.is_active(&token).await {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            debug!("rejecting token absent from or revoked in store");
            AuthError::TokenRevoked.into_response()
        }
        Err(err) => {
            // Fail closed: an unreachable store must never admit a token.
            warn!(error = %err, "revocation store check failed, denying request");
            err.into_response()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
