// src/ingest/providers/xml_feed.rs
//! XML wire shape: the relay envelope wraps a raw RSS 2.0 or Atom document.
//! Both dialects are tried in turn and converge on [`RawItem`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::relay::RelayClient;
use crate::ingest::types::{RawItem, SourceDescriptor, SourceProvider};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "content:encoded")]
    content_encoded: Option<String>,
    enclosure: Option<Enclosure>,
    #[serde(rename = "media:content")]
    media_content: Option<MediaRef>,
    #[serde(rename = "media:thumbnail")]
    media_thumbnail: Option<MediaRef>,
}

#[derive(Debug, Deserialize)]
struct Enclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaRef {
    #[serde(rename = "@url")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<String>,
    content: Option<AtomContent>,
    #[serde(rename = "media:content")]
    media_content: Option<MediaRef>,
    #[serde(rename = "media:thumbnail")]
    media_thumbnail: Option<MediaRef>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@type")]
    kind: Option<String>,
}

/// Atom `content` carries either inline text or a `url` attribute pointing
/// at the media payload.
#[derive(Debug, Deserialize)]
struct AtomContent {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "$text")]
    body: Option<String>,
}

/// Parse an RSS 2.0 or Atom document into raw items.
pub fn parse_xml_feed(xml: &str) -> Result<Vec<RawItem>> {
    if let Ok(rss) = from_str::<Rss>(xml) {
        return Ok(rss.channel.item.into_iter().map(raw_from_rss).collect());
    }
    let feed: AtomFeed = from_str(xml).context("parsing feed xml (neither rss nor atom)")?;
    Ok(feed.entry.into_iter().map(raw_from_atom).collect())
}

fn raw_from_rss(item: RssItem) -> RawItem {
    RawItem {
        title: item.title.unwrap_or_default().trim().to_string(),
        link: item.link.unwrap_or_default().trim().to_string(),
        pub_date: item.pub_date,
        description: item.description,
        content: item.content_encoded,
        enclosure_url: item.enclosure.as_ref().and_then(|e| e.url.clone()),
        enclosure_type: item.enclosure.and_then(|e| e.kind),
        media_url: item.media_content.and_then(|m| m.url),
        thumbnail: item.media_thumbnail.and_then(|m| m.url),
    }
}

fn raw_from_atom(entry: AtomEntry) -> RawItem {
    let link = entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .and_then(|l| l.href.clone())
        .unwrap_or_default();
    let enclosure = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("enclosure"));

    RawItem {
        title: entry.title.unwrap_or_default().trim().to_string(),
        link: link.trim().to_string(),
        // pubDate is RSS-only; Atom supplies published, then updated.
        pub_date: entry.published.or(entry.updated),
        description: entry.summary,
        enclosure_url: enclosure.and_then(|l| l.href.clone()),
        enclosure_type: enclosure.and_then(|l| l.kind.clone()),
        media_url: entry
            .media_content
            .and_then(|m| m.url)
            .or_else(|| entry.content.as_ref().and_then(|c| c.url.clone())),
        thumbnail: entry.media_thumbnail.and_then(|m| m.url),
        content: entry.content.and_then(|c| c.body),
    }
}

/// Provider for registry entries with [`FeedShape::Xml`]: one relay round
/// trip, then dialect-agnostic parsing.
///
/// [`FeedShape::Xml`]: crate::ingest::types::FeedShape::Xml
pub struct XmlFeedProvider {
    descriptor: SourceDescriptor,
    relay: RelayClient,
}

impl XmlFeedProvider {
    pub fn new(descriptor: SourceDescriptor, relay: RelayClient) -> Self {
        Self { descriptor, relay }
    }
}

#[async_trait]
impl SourceProvider for XmlFeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        let xml = self.relay.fetch_envelope(&self.descriptor.feed_url).await?;

        let t0 = std::time::Instant::now();
        let items = parse_xml_feed(&xml)
            .with_context(|| format!("parsing {} feed", self.descriptor.name))?;
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_items_total").increment(items.len() as u64);

        Ok(items)
    }

    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }
}
