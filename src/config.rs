//! Configuration for the relay server.
//!
//! Generation parameters are fixed when the process starts. The API credential
//! is not part of [`RelayConfig`]: it is read through a [`CredentialSource`] on
//! every request, and a missing key fails only that request.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Environment variable holding the provider API credential.
pub const API_KEY_ENV: &str = "API_KEY";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.9;
/// Default maximum number of output tokens.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;
/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

const PORT_ENV: &str = "RELAY_PORT";
const MODEL_ENV: &str = "RELAY_MODEL";
const TEMPERATURE_ENV: &str = "RELAY_TEMPERATURE";
const MAX_OUTPUT_TOKENS_ENV: &str = "RELAY_MAX_OUTPUT_TOKENS";
const GEMINI_URL_ENV: &str = "RELAY_GEMINI_URL";

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The provider base URL could not be parsed.
    #[error("invalid provider url `{value}`: {source}")]
    InvalidUrl {
        /// Raw value that failed to parse.
        value: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
}

/// Fixed generation parameters sent with every provider call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// Relay server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Provider model name.
    pub model: String,
    /// Generation parameters.
    pub generation: GenerationConfig,
    /// Provider API base URL, validated when loaded.
    pub base_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            generation: GenerationConfig::default(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
        }
    }
}

impl RelayConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment.
    ///
    /// Numeric values that fail to parse fall back to their defaults.
    ///
    /// # Errors
    /// Returns an error if `RELAY_GEMINI_URL` is set but is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns an error if the provider URL is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = parse_var(&lookup, PORT_ENV) {
            config.port = port;
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(temperature) = parse_var(&lookup, TEMPERATURE_ENV) {
            config.generation.temperature = temperature;
        }
        if let Some(max_tokens) = parse_var(&lookup, MAX_OUTPUT_TOKENS_ENV) {
            config.generation.max_output_tokens = max_tokens;
        }
        if let Some(raw) = lookup(GEMINI_URL_ENV) {
            let url = Url::parse(&raw)
                .map_err(move |source| ConfigError::InvalidUrl { value: raw, source })?;
            config.base_url = url.into();
        }

        Ok(config)
    }

    /// Set the listening port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the provider model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation.temperature = temperature;
        self
    }

    /// Set the maximum number of output tokens.
    #[must_use]
    pub const fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.generation.max_output_tokens = max_output_tokens;
        self
    }

    /// Set the provider base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &Url) -> Self {
        self.base_url = base_url.as_str().to_string();
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {key}={raw}, using default");
            None
        }
    }
}

/// Source of the provider API credential, consulted on every request.
pub trait CredentialSource: Send + Sync {
    /// Return the credential, or `None` when it is not configured.
    fn api_key(&self) -> Option<String>;
}

/// Reads the credential from an environment variable at call time.
#[derive(Clone, Debug)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    /// Read from a custom environment variable.
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(API_KEY_ENV)
    }
}

impl CredentialSource for EnvCredential {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|k| !k.trim().is_empty())
    }
}

/// A fixed, possibly absent, credential.
#[derive(Clone, Debug, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    /// A configured credential.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    /// No credential configured.
    #[must_use]
    pub const fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn api_key(&self) -> Option<String> {
        self.0.clone().filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.model, "gemini-1.5-pro");
        assert!((config.generation.temperature - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.generation.max_output_tokens, 1000);
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert!(Url::parse(&config.base_url).is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = RelayConfig::new()
            .with_port(8080)
            .with_model("gemini-1.5-flash")
            .with_temperature(0.2)
            .with_max_output_tokens(64);

        assert_eq!(config.port, 8080);
        assert_eq!(config.model, "gemini-1.5-flash");
        assert!((config.generation.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.generation.max_output_tokens, 64);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("RELAY_PORT", "4100"),
            ("RELAY_MODEL", "gemini-pro"),
            ("RELAY_TEMPERATURE", "0.5"),
            ("RELAY_MAX_OUTPUT_TOKENS", "256"),
            ("RELAY_GEMINI_URL", "http://127.0.0.1:9999"),
        ]))
        .unwrap();

        assert_eq!(config.port, 4100);
        assert_eq!(config.model, "gemini-pro");
        assert!((config.generation.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.generation.max_output_tokens, 256);
        assert_eq!(config.base_url, "http://127.0.0.1:9999/");
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("RELAY_PORT", "not-a-port"),
            ("RELAY_TEMPERATURE", "hot"),
            ("RELAY_MODEL", "   "),
        ]))
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!((config.generation.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let err = RelayConfig::from_lookup(lookup_from(&[("RELAY_GEMINI_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_static_credential() {
        assert_eq!(StaticCredential::new("k").api_key(), Some("k".to_string()));
        assert_eq!(StaticCredential::missing().api_key(), None);
        assert_eq!(StaticCredential::new("  ").api_key(), None);
    }

    #[test]
    fn test_env_credential_missing_var() {
        let source = EnvCredential::new("GEMINI_RELAY_TEST_UNSET_CREDENTIAL");
        assert_eq!(source.api_key(), None);
    }
}
