// src/ingest/relay.rs
//! Outbound retrieval through a CORS-bypassing relay. The relay fetches the
//! target URL server-side and hands the content back in one of two
//! envelopes, or as a raw passthrough for non-feed payloads.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::ingest::providers::flattened_json::FlattenedFeed;

const USER_AGENT: &str = concat!("lfc-news-aggregator/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Endpoint returning a `{ contents }` JSON envelope around the raw body.
    pub envelope_url: String,
    /// Endpoint returning the target body verbatim.
    pub raw_url: String,
    /// Endpoint returning a pre-flattened `{ status, items }` feed envelope.
    pub flattened_url: String,
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            envelope_url: "https://api.allorigins.win/get".to_string(),
            raw_url: "https://api.allorigins.win/raw".to_string(),
            flattened_url: "https://api.rss2json.com/v1/api.json".to_string(),
            timeout_secs: 20,
        }
    }
}

/// JSON envelope wrapping raw XML returned by the relay.
#[derive(Debug, Deserialize)]
struct Envelope {
    contents: Option<String>,
}

#[derive(Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    config: RelayConfig,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building relay http client")?;
        Ok(Self { client, config })
    }

    /// Append a cache-defeating parameter so the relay never serves a stale
    /// copy of the target.
    fn cache_busted(url: &str) -> String {
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{url}{sep}_t={}", chrono::Utc::now().timestamp_millis())
    }

    /// Fetch a feed URL through the `{ contents }` envelope and return the
    /// wrapped raw body.
    pub async fn fetch_envelope(&self, feed_url: &str) -> Result<String> {
        let target = Self::cache_busted(feed_url);
        let resp = self
            .client
            .get(&self.config.envelope_url)
            .query(&[("url", target.as_str())])
            .send()
            .await
            .with_context(|| format!("relay envelope request for {feed_url}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("relay returned status {}", resp.status()));
        }
        let envelope: Envelope = resp.json().await.context("decoding relay envelope")?;
        envelope
            .contents
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow!("relay envelope missing contents"))
    }

    /// Fetch a feed URL through the pre-flattened JSON endpoint.
    pub async fn fetch_flattened(&self, feed_url: &str) -> Result<FlattenedFeed> {
        let target = Self::cache_busted(feed_url);
        let resp = self
            .client
            .get(&self.config.flattened_url)
            .query(&[("rss_url", target.as_str())])
            .send()
            .await
            .with_context(|| format!("relay flattened request for {feed_url}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("relay returned status {}", resp.status()));
        }
        resp.json().await.context("decoding flattened feed envelope")
    }

    /// Fetch a URL through the raw passthrough endpoint (calendar feed).
    pub async fn fetch_raw(&self, url: &str) -> Result<String> {
        let target = Self::cache_busted(url);
        let resp = self
            .client
            .get(&self.config.raw_url)
            .query(&[("url", target.as_str())])
            .send()
            .await
            .with_context(|| format!("relay raw request for {url}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("relay returned status {}", resp.status()));
        }
        resp.text().await.context("reading relay raw body")
    }
}
