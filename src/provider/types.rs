//! Wire types for the Gemini `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    /// Conversation turns; the relay always sends exactly one.
    pub contents: Vec<RequestContent<'a>>,
    /// Sampling parameters.
    pub generation_config: GenerationParams,
}

impl<'a> GenerateContentRequest<'a> {
    /// Build a single-turn user request.
    #[must_use]
    pub fn single_turn(prompt: &'a str, config: &GenerationConfig) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationParams {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        }
    }
}

/// One turn of a request.
#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    /// Author role.
    pub role: &'a str,
    /// Text parts.
    pub parts: Vec<RequestPart<'a>>,
}

/// A text part of a request turn.
#[derive(Debug, Serialize)]
pub struct RequestPart<'a> {
    /// Prompt text.
    pub text: &'a str,
}

/// `generationConfig` block.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Output token cap.
    pub max_output_tokens: u32,
}

/// Response body of `generateContent`.
///
/// Every level is optional: the provider omits fields on safety blocks and
/// other partial results, and the relay must treat those as malformed rather
/// than fail to deserialize.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates.
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

/// A single generated candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped, e.g. `STOP` or `SAFETY`.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Content parts.
    #[serde(default)]
    pub parts: Option<Vec<Part>>,
    /// Author role, normally `model`.
    #[serde(default)]
    pub role: Option<String>,
}

/// A content part.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Text payload.
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Build a response carrying one candidate with one text part.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: Some(vec![Candidate {
                content: Some(Content {
                    parts: Some(vec![Part {
                        text: Some(text.into()),
                    }]),
                    role: Some("model".to_string()),
                }),
                finish_reason: Some("STOP".to_string()),
            }]),
        }
    }

    /// Text of the first part of the first candidate.
    ///
    /// Returns `None` if any level is missing or the text is empty.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_deref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_deref()?
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }

    /// Take ownership of the first text, see [`Self::first_text`].
    #[must_use]
    pub fn into_first_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    /// Error detail.
    pub error: ErrorDetail,
}

/// Provider error detail.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Canonical status, e.g. `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let config = GenerationConfig {
            temperature: 0.5,
            max_output_tokens: 1000,
        };
        let request = GenerateContentRequest::single_turn("hi", &config);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn test_first_text_from_provider_payload() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Hello there" }, { "text": "ignored" }],
                    "role": "model"
                },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": { "promptTokenCount": 2 }
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_text(), Some("Hello there"));
        assert_eq!(response.into_first_text().as_deref(), Some("Hello there"));
    }

    #[test]
    fn test_first_text_missing_levels() {
        let cases = [
            "{}",
            r#"{"candidates": []}"#,
            r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
            r#"{"candidates": [{"content": {"role": "model"}}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{}]}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#,
        ];
        for body in cases {
            let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
            assert_eq!(response.first_text(), None, "body: {body}");
            assert_eq!(response.into_first_text(), None, "body: {body}");
        }
    }

    #[test]
    fn test_error_envelope() {
        let body = r#"{"error": {
            "code": 400,
            "message": "API key not valid.",
            "status": "INVALID_ARGUMENT"
        }}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.message, "API key not valid.");
        assert_eq!(envelope.error.status.as_deref(), Some("INVALID_ARGUMENT"));
    }
}
