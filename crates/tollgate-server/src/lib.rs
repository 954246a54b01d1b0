//! Tollgate server wiring.
//!
//! Assembles the auth router, the revocation gate, and the chosen
//! revocation backend from a [`ServerConfig`]. The binary in `main.rs`
//! only loads configuration and hands it here.

pub mod config;
pub mod observability;

use std::sync::Arc;

use anyhow::Context;
use axum::middleware::from_fn_with_state;
use axum::{Json, Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tollgate_auth::storage::memory::{
    MemoryClientDirectory, MemoryRevocationStore, MemoryUserDirectory,
};
use tollgate_auth::storage::revocation::RevocationStore;
use tollgate_auth::token::issuer::CredentialIssuer;
use tollgate_auth::token::signer::TokenSigner;
use tollgate_auth::{AuthApiState, GateState, revocation_gate};
use tollgate_auth_redis::RedisRevocationStore;

use config::{RevocationBackendConfig, ServerConfig};

/// Builds the revocation store selected by configuration.
///
/// # Errors
///
/// Returns an error if the Redis pool cannot be constructed.
pub fn build_revocation_store(
    config: &RevocationBackendConfig,
) -> anyhow::Result<Arc<dyn RevocationStore>> {
    match config {
        RevocationBackendConfig::Memory => {
            tracing::warn!("using in-memory revocation store; tokens do not survive restarts");
            Ok(Arc::new(MemoryRevocationStore::new()))
        }
        RevocationBackendConfig::Redis {
            url,
            operation_timeout,
        } => {
            let store = RedisRevocationStore::connect(url)
                .context("failed to configure redis revocation store")?
                .with_operation_timeout(*operation_timeout);
            tracing::info!(timeout = ?operation_timeout, "using redis revocation store");
            Ok(Arc::new(store))
        }
    }
}

/// Builds the full application router.
///
/// Fails when the auth configuration is invalid; in particular a
/// missing signing secret is rejected here, before the listener binds.
///
/// # Errors
///
/// Returns an error for invalid configuration or an unusable backend.
pub fn build_router(config: &ServerConfig) -> anyhow::Result<Router> {
    config.auth.validate().context("invalid auth configuration")?;
    let signer = TokenSigner::new(&config.auth).context("failed to construct token signer")?;

    let mut users = MemoryUserDirectory::new();
    for seed in &config.users {
        users = users.with_user(&seed.email, &seed.password);
    }
    let users = Arc::new(users);

    let mut clients = MemoryClientDirectory::new();
    for client in &config.clients {
        clients = clients.with_client(client.clone());
    }
    let clients = Arc::new(clients);

    let revocations = build_revocation_store(&config.revocation)?;

    let issuer = Arc::new(CredentialIssuer::new(
        signer,
        users.clone(),
        clients,
        revocations.clone(),
        config.auth.tokens.clone(),
    ));

    let api_state = AuthApiState {
        issuer,
        users,
        federation: config.auth.federation.clone(),
    };
    let gate_state = GateState::new(revocations);

    let router = Router::new()
        .merge(tollgate_auth::router(api_state))
        .route("/api/ping", get(ping_handler))
        .layer(from_fn_with_state(gate_state, revocation_gate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(router)
}

/// Demo downstream endpoint; the revocation gate runs in front of it.
async fn ping_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "pong": true }))
}

/// Runs the server until the listener fails.
///
/// # Errors
///
/// Returns an error if binding or serving fails.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let router = build_router(&config)?;
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(bind = %config.bind, "tollgate listening");
    axum::serve(listener, router).await.context("server error")
}
