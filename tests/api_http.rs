// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /news   (mock providers, no network)
// - GET /match  (unreachable relay -> explicit "unavailable" state)

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use std::sync::Arc;
use tower::ServiceExt as _; // for `oneshot`

use lfc_news_aggregator::config::AggregatorConfig;
use lfc_news_aggregator::ingest::types::{RawItem, SourceDescriptor, SourceProvider};
use lfc_news_aggregator::{api, AppState};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

struct StaticProvider {
    descriptor: SourceDescriptor,
    items: Vec<RawItem>,
}

#[async_trait]
impl SourceProvider for StaticProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        Ok(self.items.clone())
    }

    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }
}

/// Router over mock providers and a relay nobody listens on.
fn test_router() -> Router {
    let mut config = AggregatorConfig::default();
    // nothing listens here; /match must degrade to "unavailable"
    config.relay.raw_url = "http://127.0.0.1:9/raw".to_string();

    let provider: Arc<dyn SourceProvider> = Arc::new(StaticProvider {
        descriptor: SourceDescriptor {
            name: "Test Feed".to_string(),
            feed_url: "https://example.test/feed".to_string(),
            kind: Default::default(),
            shape: Default::default(),
        },
        items: vec![RawItem {
            title: "Salah seals the points".to_string(),
            link: "https://example.test/salah".to_string(),
            pub_date: Some("Mon, 15 Jan 2024 10:30:00 GMT".to_string()),
            description: Some("<p>Late winner at Anfield.</p>".to_string()),
            ..Default::default()
        }],
    });

    let state = AppState::with_providers(config, vec![provider]).expect("state");
    api::create_router(state)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "ok");
}

#[tokio::test]
async fn api_news_returns_normalized_items() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/news")
        .body(Body::empty())
        .expect("build GET /news");

    let resp = app.oneshot(req).await.expect("oneshot /news");
    assert!(
        resp.status().is_success(),
        "GET /news should be 2xx, got {}",
        resp.status()
    );

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse news json");
    let items = v.as_array().expect("news response must be an array");
    assert_eq!(items.len(), 1);

    // Contract checks for UI consumers
    let item = &items[0];
    assert_eq!(item["title"], "Salah seals the points");
    assert_eq!(item["source_name"], "Test Feed");
    assert_eq!(item["summary"], "Late winner at Anfield.");
    assert_eq!(item["kind"], "news");
    assert!(item.get("published_at").is_some(), "missing 'published_at'");
    assert!(item.get("raw_published_at").is_some(), "missing 'raw_published_at'");
    assert!(item["tags"].is_array(), "'tags' must be an array");
}

#[tokio::test]
async fn api_match_degrades_to_unavailable_when_relay_is_down() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/match")
        .body(Body::empty())
        .expect("build GET /match");

    let resp = app.oneshot(req).await.expect("oneshot /match");
    assert!(
        resp.status().is_success(),
        "GET /match must not surface relay failures as 5xx"
    );

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse match json");
    assert_eq!(v["status"], "unavailable");
}
