//! Async client for the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::error::ProviderError;
use super::types::{ErrorDetail, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use super::{ProviderResult, TextGenerator};
use crate::config::{GenerationConfig, RelayConfig};

/// Header carrying the API credential.
const API_KEY_HEADER: &str = "x-goog-api-key";
/// API version path segment.
const API_VERSION: &str = "v1beta";
/// Connect timeout. No overall request timeout is set.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Gemini client bound to one model.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    /// Create a client for `model` served under `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the endpoint URL
    /// is invalid.
    pub fn new(base_url: &str, model: impl Into<String>) -> ProviderResult<Self> {
        let model = model.into();
        let endpoint = Url::parse(&format!(
            "{}/{API_VERSION}/models/{model}:generateContent",
            base_url.trim_end_matches('/'),
        ))?;

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .gzip(true)
            .build()
            .map_err(|e| ProviderError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            model,
        })
    }

    /// Create a client from the relay configuration.
    ///
    /// # Errors
    /// See [`Self::new`].
    pub fn from_config(config: &RelayConfig) -> ProviderResult<Self> {
        Self::new(&config.base_url, config.model.clone())
    }

    /// Model this client targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full `generateContent` URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "Gemini API"
    }

    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> ProviderResult<GenerateContentResponse> {
        let request = GenerateContentRequest::single_turn(prompt, config);

        tracing::debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| error_text(e.error))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice::<GenerateContentResponse>(&body)?)
    }
}

/// Provider message, else its canonical status name.
fn error_text(detail: ErrorDetail) -> Option<String> {
    if detail.message.is_empty() {
        detail.status.filter(|s| !s.is_empty())
    } else {
        Some(detail.message)
    }
}
