//! Chat session: conversation state plus the submit round trip.
//!
//! A session allows one request in flight. The guard is an atomic flag claimed
//! before anything is appended, so concurrent `submit` calls from other tasks
//! are rejected rather than racing, and replies always land in submission order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use super::message::{Conversation, Message, Sender, SessionId};
use super::transport::RelayTransport;
use super::{FALLBACK_MESSAGE, SUGGESTIONS};

/// Receives conversation changes. Renderers scroll to the latest entry here.
pub trait ConversationObserver: Send + Sync {
    /// Called after every append.
    fn message_appended(&self, conversation: &Conversation, latest: &Message);

    /// Called when the loading flag flips.
    fn loading_changed(&self, _loading: bool) {}
}

/// Why a submit was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Text was empty after trimming.
    Empty,
    /// Another request has not settled yet.
    Busy,
}

/// Result of [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was appended and no request was sent.
    Rejected(RejectReason),
    /// The relay replied; carries the appended assistant message.
    Replied(Message),
    /// The round trip failed; carries the appended fallback message.
    Failed(Message),
}

impl SubmitOutcome {
    /// Appended assistant message, if the submit was accepted.
    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        match self {
            Self::Rejected(_) => None,
            Self::Replied(m) | Self::Failed(m) => Some(m),
        }
    }
}

struct SessionState {
    conversation: Conversation,
    draft: String,
}

/// Releases the in-flight flag when the round trip settles or its task ends.
struct InFlight<T: RelayTransport>(Arc<Inner<T>>);

impl<T: RelayTransport> InFlight<T> {
    fn claim(inner: &Arc<Inner<T>>) -> Option<Self> {
        inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(inner)))
    }
}

impl<T: RelayTransport> Drop for InFlight<T> {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}

struct Inner<T> {
    id: SessionId,
    transport: T,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
    observers: Vec<Arc<dyn ConversationObserver>>,
}

impl<T: RelayTransport> Inner<T> {
    /// One full round trip: user entry, relay call, assistant entry.
    async fn round_trip(&self, text: String) -> SubmitOutcome {
        {
            let mut state = self.state.lock().await;
            state.draft.clear();
            self.append(&mut state.conversation, Sender::User, text.clone());
        }
        self.notify_loading(true);

        let result = self.transport.send(&text).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(reply) => {
                let message = self.append(&mut state.conversation, Sender::Assistant, reply);
                SubmitOutcome::Replied(message)
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "Relay round trip failed: {e}");
                let message = self.append(
                    &mut state.conversation,
                    Sender::Assistant,
                    FALLBACK_MESSAGE.to_string(),
                );
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn append(&self, conversation: &mut Conversation, sender: Sender, text: String) -> Message {
        let message = conversation.push(sender, text).clone();
        for observer in &self.observers {
            observer.message_appended(conversation, &message);
        }
        message
    }

    fn notify_loading(&self, loading: bool) {
        for observer in &self.observers {
            observer.loading_changed(loading);
        }
    }
}

/// Client-side chat session over a [`RelayTransport`].
///
/// Round trips run on their own tokio task: once accepted, a submit always
/// settles with one assistant entry even if the caller stops awaiting it.
pub struct ChatSession<T> {
    inner: Arc<Inner<T>>,
}

impl<T: RelayTransport + 'static> ChatSession<T> {
    /// Create an empty session.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: SessionId::new(),
                transport,
                state: Mutex::new(SessionState {
                    conversation: Conversation::new(),
                    draft: String::new(),
                }),
                in_flight: AtomicBool::new(false),
                observers: Vec::new(),
            }),
        }
    }

    /// Register an observer. Call before the first submit.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ConversationObserver>) -> Self {
        let id = self.inner.id;
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.observers.push(observer),
            None => tracing::warn!(session = %id, "Observer ignored, round trip running"),
        }
        self
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.inner.id
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of the conversation.
    pub async fn conversation(&self) -> Conversation {
        self.inner.state.lock().await.conversation.clone()
    }

    /// Current draft input.
    pub async fn draft(&self) -> String {
        self.inner.state.lock().await.draft.clone()
    }

    /// Replace the draft input.
    pub async fn set_draft(&self, text: impl Into<String>) {
        self.inner.state.lock().await.draft = text.into();
    }

    /// Empty the draft input.
    pub async fn clear_draft(&self) {
        self.inner.state.lock().await.draft.clear();
    }

    /// Fill the draft with starter suggestion `index`.
    ///
    /// Returns `false` for an unknown index. Does not submit.
    pub async fn use_suggestion(&self, index: usize) -> bool {
        match SUGGESTIONS.get(index) {
            Some(suggestion) => {
                self.set_draft(*suggestion).await;
                true
            }
            None => false,
        }
    }

    /// Submit the current draft.
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let draft = self.draft().await;
        self.submit(&draft).await
    }

    /// Send `text` to the relay and append the outcome.
    ///
    /// Rejected without side effects if `text` is blank or a request is
    /// already in flight. Otherwise the user message is appended and the draft
    /// cleared before the request is sent; exactly one assistant message is
    /// appended when it settles.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Rejected(RejectReason::Empty);
        }
        let Some(guard) = InFlight::claim(&self.inner) else {
            tracing::debug!(session = %self.inner.id, "Submit ignored, request in flight");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        };

        let text = text.to_string();
        let task = tokio::spawn(async move {
            let outcome = guard.0.round_trip(text).await;
            let inner = Arc::clone(&guard.0);
            drop(guard);
            inner.notify_loading(false);
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(session = %self.inner.id, "Round trip task failed: {e}");
                let mut state = self.inner.state.lock().await;
                let message = self.inner.append(
                    &mut state.conversation,
                    Sender::Assistant,
                    FALLBACK_MESSAGE.to_string(),
                );
                SubmitOutcome::Failed(message)
            }
        }
    }
}
