//! Relay errors and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::dto::ErrorBody;
use crate::provider::ProviderError;

/// Message used when a provider error carries no text.
pub const FALLBACK_ERROR: &str = "Failed to fetch response";

/// Errors produced while handling a relay request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// `message` absent, empty or whitespace-only.
    #[error("Message is required")]
    MessageRequired,

    /// Body was not JSON or had the wrong shape.
    #[error("Invalid JSON body")]
    InvalidBody,

    /// No API credential configured.
    #[error("API key not configured")]
    ApiKeyMissing,

    /// Provider answered without a usable text part.
    #[error("Unexpected response format from {provider}")]
    UnexpectedResponse {
        /// Provider name.
        provider: String,
    },

    /// Provider call failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl RelayError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MessageRequired | Self::InvalidBody => StatusCode::BAD_REQUEST,
            Self::ApiKeyMissing | Self::UnexpectedResponse { .. } | Self::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text placed in the `error` field of the response body.
    #[must_use]
    pub fn public_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_ERROR.to_string()
        } else {
            message
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Relay request failed: {self}");
        } else {
            tracing::debug!("Rejected relay request: {self}");
        }

        let body = Json(ErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
