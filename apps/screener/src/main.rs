use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use screener::cache::{ScreeningCaches, SystemClock};
use screener::config::Config;
use screener::evidence::GithubEvidenceCollector;
use screener::extraction::LlmExtractor;
use screener::links::HttpLinkValidator;
use screener::llm_client::{self, LlmClient};
use screener::pipeline::{Collaborators, Screener};
use screener::routes::build_router;
use screener::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let evidence = GithubEvidenceCollector::new(config.github_token.clone())
        .context("Failed to build GitHub client")?;
    if config.github_token.is_none() {
        info!("GITHUB_TOKEN not set; evidence collection uses the anonymous rate limit");
    }

    let links = HttpLinkValidator::new().context("Failed to build link validator")?;

    let settings = config.screener_settings();
    info!(
        interactive_rpm = settings.interactive_rpm,
        batch_rpm = settings.batch_rpm,
        max_attempts = settings.retry.max_attempts,
        "Screener settings"
    );

    let screener = Screener::new(
        Collaborators {
            extractor: Arc::new(LlmExtractor(llm)),
            evidence: Arc::new(evidence),
            links: Arc::new(links),
        },
        ScreeningCaches::in_memory(&config.cache_ttls(), Arc::new(SystemClock)),
        settings,
    );

    let state = AppState {
        screener: Arc::new(screener),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
