//! Startup helpers for the relay server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::config::{API_KEY_ENV, CredentialSource, EnvCredential, RelayConfig};
use crate::server::{self, AppState};

/// Initialize `tracing` with `RUST_LOG` support and an `info` default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Run the server (used by the `gemini-relay-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();

    tracing::info!("Starting Gemini relay v{}", env!("CARGO_PKG_VERSION"));

    let (config, state) = match initialize() {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let serve = server::run_server_with_shutdown(state, config.port, shutdown_signal());
    if let Err(e) = rt.block_on(serve) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    tracing::info!("Gemini relay stopped");
    ExitCode::SUCCESS
}

/// Load configuration and build application state without starting the server.
///
/// A missing credential only produces a warning; requests then fail individually.
///
/// # Errors
/// Returns an error if configuration or state creation fails.
pub fn initialize()
-> Result<(RelayConfig, Arc<AppState>), Box<dyn std::error::Error + Send + Sync>> {
    let config = RelayConfig::from_env()?;
    tracing::info!(
        model = %config.model,
        temperature = config.generation.temperature,
        max_output_tokens = config.generation.max_output_tokens,
        "Provider endpoint: {}",
        config.base_url
    );

    if EnvCredential::default().api_key().is_none() {
        tracing::warn!("{API_KEY_ENV} is not set; relay requests will fail until it is configured");
    }

    let state = AppState::new(config.clone())?;
    Ok((config, state))
}

/// Resolve when Ctrl+C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
