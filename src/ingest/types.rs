// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Content kind of a registered source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    News,
    Podcast,
}

/// Wire shape produced by the relay for a given source. Selected per
/// registry entry, never sniffed from the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedShape {
    #[default]
    Xml,
    FlattenedJson,
}

/// One entry of the source registry. Read-only after startup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub feed_url: String,
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default)]
    pub shape: FeedShape,
}

/// Uniform raw-field record both wire shapes converge on before
/// normalization. Image hints stay separate so the resolution cascade can
/// rank them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub pub_date: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub enclosure_url: Option<String>,
    pub enclosure_type: Option<String>,
    pub media_url: Option<String>,
    pub thumbnail: Option<String>,
}

/// Canonical item handed to the presentation layer. Constructed fresh on
/// every run, never mutated afterwards. `title` and `link` are non-empty.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Original date string, retained for display fallback.
    pub raw_published_at: String,
    pub summary: Option<String>,
    pub full_content: Option<String>,
    pub source_name: String,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub kind: SourceKind,
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// Fetch and parse the source's feed into raw items. Errors are isolated
    /// by the orchestrator; they never abort the aggregate run.
    async fn fetch_latest(&self) -> Result<Vec<RawItem>>;
    fn descriptor(&self) -> &SourceDescriptor;
}
