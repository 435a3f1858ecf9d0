use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod relay;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use relay::SynthesisRelay;
use tts::GoogleTts;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    tracing::info!("TTS Relay Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Voice: {} ({})",
        config.voice.name,
        config.voice.language_code
    );
    if config.credentials_json.is_none() {
        tracing::info!("No credentials JSON set, using application default credentials");
    }

    // Create provider client
    let provider = GoogleTts::new(config.credentials_json.as_deref(), config.request_timeout)
        .await
        .context("Failed to initialize Google TTS client")?;

    let state = Arc::new(AppState {
        relay: SynthesisRelay::new(Arc::new(provider), config.voice.clone()),
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    tracing::info!("Listening on http://{}", config.addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
