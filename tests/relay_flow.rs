//! End-to-end: chat session -> HTTP transport -> relay router -> fake provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::routing::post;
use url::Url;

use gemini_relay::client::{
    ChatSession, FALLBACK_MESSAGE, HttpRelayTransport, Sender, SubmitOutcome,
};
use gemini_relay::config::{GenerationConfig, RelayConfig, StaticCredential};
use gemini_relay::provider::{
    GeminiClient, GenerateContentResponse, ProviderResult, TextGenerator,
};
use gemini_relay::server::{AppState, RELAY_PATH, create_app};

struct EchoProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for EchoProvider {
    fn name(&self) -> &str {
        "Gemini API"
    }

    async fn generate(
        &self,
        _api_key: &str,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> ProviderResult<GenerateContentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt == "shape" {
            return Ok(GenerateContentResponse::default());
        }
        Ok(GenerateContentResponse::from_text(format!("You said: {prompt}")))
    }
}

async fn spawn_relay(provider: Arc<EchoProvider>, key: StaticCredential) -> Url {
    let state = AppState::with_parts(RelayConfig::default(), provider, Arc::new(key));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_app(state)).await.unwrap();
    });
    Url::parse(&format!("http://{addr}{RELAY_PATH}")).unwrap()
}

#[tokio::test]
async fn conversation_round_trips_through_relay() {
    let provider = Arc::new(EchoProvider {
        calls: AtomicUsize::new(0),
    });
    let url = spawn_relay(Arc::clone(&provider), StaticCredential::new("key")).await;
    let session = ChatSession::new(HttpRelayTransport::new(url).unwrap());

    assert!(matches!(session.submit("hello").await, SubmitOutcome::Replied(_)));
    assert!(matches!(session.submit("again").await, SubmitOutcome::Replied(_)));

    let conversation = session.conversation().await;
    let entries: Vec<(Sender, String)> = conversation
        .iter()
        .map(|m| (m.sender(), m.text().to_string()))
        .collect();
    assert_eq!(
        entries,
        [
            (Sender::User, "hello".to_string()),
            (Sender::Assistant, "You said: hello".to_string()),
            (Sender::User, "again".to_string()),
            (Sender::Assistant, "You said: again".to_string()),
        ]
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn relay_errors_collapse_to_fallback() {
    let provider = Arc::new(EchoProvider {
        calls: AtomicUsize::new(0),
    });
    let url = spawn_relay(Arc::clone(&provider), StaticCredential::missing()).await;
    let session = ChatSession::new(HttpRelayTransport::new(url).unwrap());

    let outcome = session.submit("hello").await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ref m) if m.text() == FALLBACK_MESSAGE));
    assert_eq!(session.conversation().await.len(), 2);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_provider_reply_is_a_single_failed_call() {
    let provider = Arc::new(EchoProvider {
        calls: AtomicUsize::new(0),
    });
    let url = spawn_relay(Arc::clone(&provider), StaticCredential::new("key")).await;
    let session = ChatSession::new(HttpRelayTransport::new(url).unwrap());

    let outcome = session.submit("shape").await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

async fn spawn_gemini_fake(body: &'static str) -> String {
    let app = Router::new().route(
        "/v1beta/models/gemini-1.5-pro:generateContent",
        post(move || async move { ([("content-type", "application/json")], body) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn wrongly_typed_gemini_body_reports_unexpected_format() {
    for body in [
        r#"{"candidates":[{"content":{"parts":"oops"}}]}"#,
        r#"{"candidates":[{"content":{"parts":[{"text":42}]}}]}"#,
    ] {
        let base = spawn_gemini_fake(body).await;
        let config = RelayConfig::default();
        let generator = Arc::new(GeminiClient::new(&base, config.model.clone()).unwrap());
        let state = AppState::with_parts(config, generator, Arc::new(StaticCredential::new("key")));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_app(state)).await.unwrap();
        });

        let response = reqwest::Client::new()
            .post(format!("http://{addr}{RELAY_PATH}"))
            .json(&serde_json::json!({ "message": "Hi" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 500, "body: {body}");
        let json: serde_json::Value = response.json().await.unwrap();
        assert_eq!(json["error"], "Unexpected response format from Gemini API");
    }
}
