//! Error types for provider calls.

use thiserror::Error;

/// Errors that can occur while calling the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Provider answered with a non-success status.
    #[error("[{status}] {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the status reason when absent.
        message: String,
    },

    /// Success status but the body was not the expected JSON shape.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Check if the failure happened before reaching the provider.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::HttpRequest(_) | Self::HttpClient(_))
    }
}
