//! JSON bodies exchanged on the relay route.

use serde::{Deserialize, Serialize};

/// Inbound relay request.
///
/// `message` is optional at the type level so that `{}` reaches validation
/// instead of failing deserialization.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RelayRequest {
    /// The user's message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RelayRequest {
    /// Request carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// Successful relay response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReply {
    /// Extracted provider text.
    pub reply: String,
}

/// Failed relay response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error description.
    pub error: String,
}
