//! Transport from the chat client to the relay route.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::server::{ErrorBody, RelayReply, RelayRequest};

/// Errors raised while talking to the relay.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network failure.
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay answered with a non-success status.
    #[error("relay returned {status}: {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error text from the body, if any.
        detail: String,
    },

    /// Success status but the body had no `reply`.
    #[error("malformed relay response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One round trip to the relay.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Send `message` and return the reply text.
    ///
    /// # Errors
    /// Returns an error on network failure, non-2xx status or malformed body.
    async fn send(&self, message: &str) -> Result<String, TransportError>;
}

/// `reqwest`-backed transport posting to the relay route.
#[derive(Clone, Debug)]
pub struct HttpRelayTransport {
    client: Client,
    url: Url,
}

impl HttpRelayTransport {
    /// Create a transport for the relay at `url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: Url) -> Result<Self, TransportError> {
        let client = Client::builder().build()?;
        Ok(Self { client, url })
    }

    /// Relay URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&RelayRequest::new(message))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let reply: RelayReply = serde_json::from_str(&body)?;
        Ok(reply.reply)
    }
}
