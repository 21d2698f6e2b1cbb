//! HTTP route handlers for the relay API.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::dto::{RelayReply, RelayRequest};
use super::error::RelayError;
use super::state::AppState;
use crate::provider::ProviderError;

/// Path of the relay route.
pub const RELAY_PATH: &str = "/api/gemini";

/// Create the API router with all routes.
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(RELAY_PATH, post(relay_message))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "gemini-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.config.model,
    }))
}

/// Relay one message to the provider and return the first text part.
///
/// Validation and the credential check both happen before the provider is
/// contacted. The provider is called at most once.
async fn relay_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayReply>, RelayError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Unreadable relay body: {rejection}");
        RelayError::InvalidBody
    })?;

    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or(RelayError::MessageRequired)?;

    let api_key = state.credentials.api_key().ok_or(RelayError::ApiKeyMissing)?;

    let unexpected = || RelayError::UnexpectedResponse {
        provider: state.generator.name().to_string(),
    };

    let response = state
        .generator
        .generate(&api_key, &message, &state.config.generation)
        .await
        .map_err(|e| match e {
            ProviderError::MalformedResponse(source) => {
                tracing::warn!("Undecodable provider body: {source}");
                unexpected()
            }
            other => RelayError::Provider(other),
        })?;

    let reply = response.into_first_text().ok_or_else(unexpected)?;

    tracing::debug!(chars = reply.len(), "Relayed provider reply");

    Ok(Json(RelayReply { reply }))
}
