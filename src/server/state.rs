//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::{CredentialSource, EnvCredential, RelayConfig};
use crate::provider::{GeminiClient, ProviderError, TextGenerator};

/// Shared application state.
///
/// Holds no per-request data; every handler invocation is independent.
pub struct AppState {
    /// Provider used to generate replies.
    pub generator: Arc<dyn TextGenerator>,
    /// Credential lookup, consulted on each request.
    pub credentials: Arc<dyn CredentialSource>,
    /// Startup configuration.
    pub config: RelayConfig,
}

impl AppState {
    /// Create state backed by the Gemini API and the `API_KEY` variable.
    ///
    /// # Errors
    /// Returns an error if the Gemini client cannot be created.
    pub fn new(config: RelayConfig) -> Result<Arc<Self>, ProviderError> {
        let generator = GeminiClient::from_config(&config)?;
        Ok(Self::with_parts(
            config,
            Arc::new(generator),
            Arc::new(EnvCredential::default()),
        ))
    }

    /// Create state from explicit components.
    #[must_use]
    pub fn with_parts(
        config: RelayConfig,
        generator: Arc<dyn TextGenerator>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Arc<Self> {
        Arc::new(Self {
            generator,
            credentials,
            config,
        })
    }
}
