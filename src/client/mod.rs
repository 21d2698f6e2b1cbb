//! Chat client for the relay.
//!
//! - [`ChatSession`]: conversation history, draft input and the submit guard
//! - [`HttpRelayTransport`]: posts `{ "message": ... }` to the relay route
//! - [`ConversationObserver`]: render hook fired after every append

pub mod message;
pub mod session;
pub mod transport;

pub use message::{Conversation, Message, MessageId, Sender, SessionId};
pub use session::{ChatSession, ConversationObserver, RejectReason, SubmitOutcome};
pub use transport::{HttpRelayTransport, RelayTransport, TransportError};

/// Assistant text appended when a round trip fails for any reason.
pub const FALLBACK_MESSAGE: &str = "Sorry, there was an error processing your request.";

/// Starter prompts offered while the conversation is empty.
pub const SUGGESTIONS: [&str; 4] = [
    "Explain quantum computing in simple terms",
    "Suggest a productivity tip for developers",
    "How does blockchain technology work?",
    "Give me a creative project idea",
];

/// Default relay URL used by the terminal client.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000/api/gemini";
