//! IRIS voice companion server
//!
//! Orchestrates spoken conversations over WebSocket: audio in, transcription,
//! reasoning, synthesis, audio out. Each connection runs its own turn state
//! machine; blocking speech engines run on a shared worker pool.

mod api;
mod config;
mod dispatch;
mod llm;
mod protocol;
mod reasoning;
mod session;
mod speech;
mod state_machine;

use api::{create_router, AppState};
use config::ServerConfig;
use dispatch::BlockingDispatcher;
use llm::{ChatCompletionsService, LoggingService};
use reasoning::ReasoningAdapter;
use session::TurnServices;
use speech::{ElevenLabsSynthesizer, HttpTranscriber, SilenceGate, SilentSynthesizer, Synthesizer};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iris_voice=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ServerConfig::from_env();

    // Reasoning backend
    let llm = Arc::new(LoggingService::new(Arc::new(ChatCompletionsService::new(&config.llm)?)));
    let reasoner = Arc::new(ReasoningAdapter::new(llm, &config.llm, config.affect));
    tracing::info!(
        url = %config.llm.url,
        model = %config.llm.model,
        timeout_secs = config.llm.timeout.as_secs(),
        "Reasoning backend configured"
    );

    // Speech engines
    let transcriber = Arc::new(SilenceGate::new(
        HttpTranscriber::new(&config.transcription),
        config.transcription.silence_rms,
    ));
    let synthesizer: Arc<dyn Synthesizer> = if let Some(key) = &config.synthesis.api_key {
        tracing::info!(voice_id = %config.synthesis.voice_id, "Speech synthesis enabled");
        Arc::new(ElevenLabsSynthesizer::new(&config.synthesis, key.clone()))
    } else {
        tracing::warn!("ELEVENLABS_API_KEY not set; replies will carry no audio");
        Arc::new(SilentSynthesizer)
    };

    let services = TurnServices {
        transcriber,
        synthesizer,
        reasoner,
        dispatcher: BlockingDispatcher::new(config.blocking_workers),
    };
    let state = AppState::new(
        services,
        config.inbound_queue,
        config.synthesis.api_key.is_some(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        blocking_workers = config.blocking_workers,
        "IRIS voice server listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
