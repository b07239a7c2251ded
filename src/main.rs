//! LFC News Aggregator — Binary Entrypoint
//! Boots the Axum HTTP server wiring the ingest pipeline, fixture feed, and
//! metrics exporter behind a small JSON API.

use lfc_news_aggregator::{api, config::AggregatorConfig, metrics::Metrics};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AggregatorConfig::load_default()?;
    let metrics = Metrics::init(config.sources.len());

    let state = api::AppState::from_config(config)?;
    let router = api::create_router(state).merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
