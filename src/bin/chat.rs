//! Terminal chat client for a running relay.
//! Run with: cargo run --bin gemini-chat -- [relay-url]

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use gemini_relay::client::{
    ChatSession, Conversation, ConversationObserver, DEFAULT_RELAY_URL, HttpRelayTransport,
    Message, RejectReason, SUGGESTIONS, Sender, SubmitOutcome,
};
use gemini_relay::start_relay::init_tracing;

/// Prints each appended message; the terminal scrolls on its own.
struct TerminalView;

impl ConversationObserver for TerminalView {
    fn message_appended(&self, _conversation: &Conversation, latest: &Message) {
        if latest.sender() == Sender::Assistant {
            println!("\nGemini: {}\n", latest.text());
        }
    }

    fn loading_changed(&self, loading: bool) {
        if loading {
            println!("Gemini is typing...");
        }
    }
}

fn print_welcome() {
    println!();
    println!("  How can I help you today?");
    println!("  Ask me anything about technology, science, or creative ideas.");
    println!();
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        println!("  [{}] {suggestion}", i + 1);
    }
    println!();
    println!("  Type a number to pick a suggestion, /quit to exit.");
    println!();
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let raw_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RELAY_URL").ok())
        .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());
    let url = Url::parse(&raw_url).with_context(|| format!("invalid relay url `{raw_url}`"))?;

    let transport = HttpRelayTransport::new(url).context("failed to build HTTP client")?;
    println!("  Relay: {}", transport.url());
    let session = ChatSession::new(transport).with_observer(Arc::new(TerminalView));

    print_welcome();
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim_end_matches(['\r', '\n']);

        if line.trim() == "/quit" {
            break;
        }

        if session.conversation().await.is_empty() {
            if let Ok(n) = line.trim().parse::<usize>() {
                if n >= 1 && session.use_suggestion(n - 1).await {
                    println!("Draft: {}  (press Enter to send)", session.draft().await);
                    prompt();
                    continue;
                }
            }
        }

        let outcome = if line.trim().is_empty() {
            session.submit_draft().await
        } else {
            session.submit(line).await
        };

        if let SubmitOutcome::Rejected(RejectReason::Busy) = outcome {
            println!("Still waiting for the previous reply.");
        }
        prompt();
    }

    Ok(())
}
