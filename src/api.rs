use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::cors::CorsLayer;

use crate::config::AggregatorConfig;
use crate::fixture::{self, FixtureOutcome, MatchFixture};
use crate::ingest::{self, providers, relay::RelayClient, types::NewsItem, types::SourceProvider};

#[derive(Clone)]
pub struct AppState {
    config: Arc<AggregatorConfig>,
    providers: Arc<Vec<Arc<dyn SourceProvider>>>,
    relay: RelayClient,
}

impl AppState {
    /// Wire the relay and one provider per registry entry from configuration.
    pub fn from_config(config: AggregatorConfig) -> anyhow::Result<Self> {
        let relay = RelayClient::new(config.relay.clone())?;
        let providers = providers::build(&config, &relay);
        Ok(Self {
            config: Arc::new(config),
            providers: Arc::new(providers),
            relay,
        })
    }

    /// Assemble state with injected providers (used by HTTP-level tests).
    pub fn with_providers(
        config: AggregatorConfig,
        providers: Vec<Arc<dyn SourceProvider>>,
    ) -> anyhow::Result<Self> {
        let relay = RelayClient::new(config.relay.clone())?;
        Ok(Self {
            config: Arc::new(config),
            providers: Arc::new(providers),
            relay,
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(news))
        .route("/match", get(next_match))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// One aggregation pass over every registered source. Always 200: failed
/// sources contribute zero items, and an all-failed run is an empty list.
async fn news(State(state): State<AppState>) -> Json<Vec<NewsItem>> {
    Json(ingest::run_once(&state.providers, &state.config).await)
}

#[derive(serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum MatchResponse {
    /// The earliest fixture still inside its eligibility window.
    Upcoming { fixture: MatchFixture },
    /// The calendar parsed fine but holds no eligible events.
    NoneScheduled,
    /// The calendar could not be fetched or read at all.
    Unavailable,
}

async fn next_match(State(state): State<AppState>) -> Json<MatchResponse> {
    let outcome = fetch_next_fixture(&state).await;
    let response = match outcome {
        Ok(FixtureOutcome::Upcoming(fixture)) => MatchResponse::Upcoming { fixture },
        Ok(FixtureOutcome::NoneScheduled) => MatchResponse::NoneScheduled,
        Err(e) => {
            tracing::warn!(error = ?e, "calendar feed unavailable");
            MatchResponse::Unavailable
        }
    };
    Json(response)
}

async fn fetch_next_fixture(state: &AppState) -> anyhow::Result<FixtureOutcome> {
    let ics = state.relay.fetch_raw(&state.config.calendar_url).await?;
    Ok(fixture::next_fixture(
        &ics,
        &state.config.home_club,
        chrono::Utc::now(),
    ))
}
