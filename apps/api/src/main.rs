use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vidmeta_api::config::Config;
use vidmeta_api::llm_client::{self, LlmClient};
use vidmeta_api::metadata::pipeline::MetadataPipeline;
use vidmeta_api::metadata::retry::{cancellation, RetryController};
use vidmeta_api::routes::build_router;
use vidmeta_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting vidmeta API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build the metadata pipeline (immutable, shared by all requests)
    let schema = config.schema();
    info!(
        "Metadata schema: {} categories, {} intents",
        schema.categories.len(),
        schema.intents.len()
    );
    let retry =
        RetryController::new(config.max_attempts).with_attempt_timeout(config.attempt_timeout);
    let mut pipeline = MetadataPipeline::new(Arc::new(llm), schema, retry);
    if let Some(max) = config.max_input_chars {
        pipeline = pipeline.with_max_input_chars(max);
    }
    info!(
        "Metadata pipeline ready: {} attempt(s), {}s per attempt",
        config.max_attempts,
        config.attempt_timeout.as_secs()
    );

    let (shutdown_handle, shutdown_signal) = cancellation();
    let state = AppState {
        pipeline: Arc::new(pipeline),
        shutdown: shutdown_signal,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown requested, cancelling in-flight generations");
            shutdown_handle.cancel();
        })
        .await?;

    Ok(())
}
