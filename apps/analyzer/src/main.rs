mod analysis;
mod config;
mod errors;
mod llm_client;
mod report;
mod routes;
mod scrape;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scrape::PageScraper;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ogilvy Marketing Analyzer v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        config.llm_api_url.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm_client::MODEL,
        llm.api_url()
    );

    let scraper = PageScraper::new(Duration::from_secs(config.scrape_timeout_secs))?
        .with_body_limit(config.scrape_max_bytes);
    info!(
        "Page scraper initialized (timeout: {}s, body limit: {} bytes)",
        config.scrape_timeout_secs, config.scrape_max_bytes
    );

    let state = AppState { llm, scraper };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
