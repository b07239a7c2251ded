// src/ingest/providers/flattened_json.rs
//! Flattened wire shape: the relay has already parsed the feed and returns
//! a `{ status, items }` JSON envelope. A non-"ok" status yields zero items.

use anyhow::Result;
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::ingest::relay::RelayClient;
use crate::ingest::types::{RawItem, SourceDescriptor, SourceProvider};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlattenedFeed {
    pub status: String,
    pub items: Vec<FlattenedItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlattenedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub enclosure: Option<FlattenedEnclosure>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlattenedEnclosure {
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Convert a flattened envelope into raw items. The envelope's thumbnail is
/// this shape's media hint; the enclosure link doubles as a link fallback.
pub fn raw_items(feed: FlattenedFeed) -> Vec<RawItem> {
    if feed.status != "ok" {
        return Vec::new();
    }
    feed.items.into_iter().map(raw_from_flattened).collect()
}

fn raw_from_flattened(item: FlattenedItem) -> RawItem {
    let enclosure_link = item.enclosure.as_ref().and_then(|e| e.link.clone());
    let link = item
        .link
        .filter(|l| !l.trim().is_empty())
        .or_else(|| enclosure_link.clone())
        .unwrap_or_default();

    RawItem {
        title: item.title.unwrap_or_default().trim().to_string(),
        link: link.trim().to_string(),
        pub_date: item.pub_date,
        description: item.description,
        content: item.content,
        enclosure_url: enclosure_link,
        enclosure_type: item.enclosure.and_then(|e| e.kind),
        media_url: item.thumbnail.filter(|t| !t.is_empty()),
        thumbnail: None,
    }
}

/// Provider for registry entries with [`FeedShape::FlattenedJson`].
///
/// [`FeedShape::FlattenedJson`]: crate::ingest::types::FeedShape::FlattenedJson
pub struct FlattenedJsonProvider {
    descriptor: SourceDescriptor,
    relay: RelayClient,
}

impl FlattenedJsonProvider {
    pub fn new(descriptor: SourceDescriptor, relay: RelayClient) -> Self {
        Self { descriptor, relay }
    }
}

#[async_trait]
impl SourceProvider for FlattenedJsonProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        let feed = self.relay.fetch_flattened(&self.descriptor.feed_url).await?;

        let t0 = std::time::Instant::now();
        let items = raw_items(feed);
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_items_total").increment(items.len() as u64);

        Ok(items)
    }

    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }
}
