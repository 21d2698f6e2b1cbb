//! Generative-text provider abstraction.
//!
//! The relay route only depends on [`TextGenerator`]; [`GeminiClient`] is the
//! production implementation and tests substitute their own.

pub mod error;
pub mod gemini;
pub mod types;

pub use error::ProviderError;
pub use gemini::GeminiClient;
pub use types::{Candidate, Content, GenerateContentResponse, Part};

use async_trait::async_trait;

use crate::config::GenerationConfig;

/// Convenience result alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// A text-generation backend exposing a single `generate` operation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider name used in error messages.
    fn name(&self) -> &str;

    /// Send `prompt` with the fixed generation parameters and return the raw
    /// provider response. Callers extract the reply text themselves.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success provider status.
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> ProviderResult<GenerateContentResponse>;
}
