// src/ingest/normalize.rs
//! Field normalization: image resolution, timestamp repair, HTML stripping,
//! and construction of the canonical [`NewsItem`]. Every heuristic is an
//! ordered chain of present-or-absent rules so each one tests in isolation.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

use crate::config::AggregatorConfig;
use crate::ingest::types::{NewsItem, RawItem, SourceDescriptor};
use crate::ingest::tags;

/// Reddit uses these thumbnail values as text-post sentinels; they are not
/// image URLs.
const REDDIT_SENTINELS: [&str; 3] = ["self", "default", "nsfw"];

/// Reach PLC image CDNs serve a size-coded path segment that can be rewritten
/// for a higher resolution variant.
const REACH_CDN_HOSTS: [&str; 2] = ["i2-prod.liverpool.com", "i2-prod.liverpoolecho.co.uk"];

const GUARDIAN_CDN_HOST: &str = "i.guim.co.uk";

static RE_IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img[^>]+src="([^">]+)""#).expect("img src regex"));
static RE_REACH_SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/s\d+/").expect("size regex"));
static RE_BARE_DATETIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("bare datetime regex"));
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Build the canonical item, or `None` when the raw record fails the
/// title/link invariant.
pub fn build_item(
    raw: RawItem,
    source: &SourceDescriptor,
    config: &AggregatorConfig,
    now: DateTime<Utc>,
) -> Option<NewsItem> {
    let title = raw.title.trim().to_string();
    let link = raw.link.trim().to_string();
    if title.is_empty() || link.is_empty() {
        return None;
    }

    let raw_published_at = raw.pub_date.clone().unwrap_or_default();
    let published_at = resolve_timestamp(&raw_published_at, now);
    let summary = raw
        .description
        .as_deref()
        .map(strip_html)
        .filter(|s| !s.is_empty());
    let image_url = resolve_image(&raw, source, &config.fallback_image_url);
    let tags = tags::classify(&config.tags, &title, summary.as_deref().unwrap_or(""));

    Some(NewsItem {
        title,
        link,
        published_at,
        raw_published_at,
        summary,
        full_content: raw.content,
        source_name: source.name.clone(),
        image_url,
        tags,
        kind: source.kind,
    })
}

/// Image resolution cascade, first match wins, then source-specific
/// post-processing.
pub fn resolve_image(
    raw: &RawItem,
    source: &SourceDescriptor,
    fallback_url: &str,
) -> Option<String> {
    let mut image = image_from_enclosure(raw)
        .or_else(|| raw.media_url.clone())
        .or_else(|| image_from_html(raw));

    if let Some(url) = image.as_deref() {
        if REACH_CDN_HOSTS.iter().any(|h| url.contains(h)) {
            image = Some(upgrade_reach_resolution(url));
        }
    }
    if let Some(url) = image.as_deref() {
        if url.contains(GUARDIAN_CDN_HOST) {
            image = Some(strip_query(url));
        }
    }
    if image.is_none() && source.name == "Anfield Watch" {
        image = Some(fallback_url.to_string());
    }
    if source.name == "Reddit" {
        image = Some(reddit_thumbnail(raw.thumbnail.as_deref(), fallback_url));
    }
    image
}

fn image_from_enclosure(raw: &RawItem) -> Option<String> {
    match (&raw.enclosure_url, &raw.enclosure_type) {
        (Some(url), Some(kind)) if kind.starts_with("image/") => Some(url.clone()),
        _ => None,
    }
}

/// First `<img src="...">` inside the description or encoded content HTML.
fn image_from_html(raw: &RawItem) -> Option<String> {
    let html = match (&raw.description, &raw.content) {
        (Some(d), _) if !d.is_empty() => d,
        (_, Some(c)) => c,
        _ => return None,
    };
    RE_IMG_SRC
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Rewrite the `/s<digits>/` size segment to request a 1200px variant.
pub fn upgrade_reach_resolution(url: &str) -> String {
    RE_REACH_SIZE.replace(url, "/s1200/").into_owned()
}

/// Drop the query string; the Guardian CDN serves a downscaled image when
/// width/quality parameters are present.
pub fn strip_query(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

fn reddit_thumbnail(thumbnail: Option<&str>, fallback_url: &str) -> String {
    match thumbnail {
        Some(t) if !t.is_empty() && !REDDIT_SENTINELS.contains(&t) => t.to_string(),
        _ => fallback_url.to_string(),
    }
}

/// Resolve a raw date string to a UTC instant.
///
/// A bare `YYYY-MM-DD HH:mm:ss` stamp carries no zone marker and is defined
/// to be UTC: it is re-read with a literal `T` and a trailing `Z`. Anything
/// else goes through general parsing (RFC 2822, then RFC 3339, then a loose
/// zone-less ISO form). A zone-less stamp that still comes out ahead of the
/// clock was read with a local offset and is re-read as UTC.
pub fn resolve_timestamp(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let parsed = if RE_BARE_DATETIME.is_match(s) {
        parse_bare_utc(s)
    } else {
        parse_general(s)
    }?;
    if parsed > now && RE_BARE_DATETIME.is_match(s) {
        return parse_bare_utc(s);
    }
    Some(parsed)
}

fn parse_bare_utc(s: &str) -> Option<DateTime<Utc>> {
    let iso = format!("{}Z", s.replacen(' ', "T", 1));
    DateTime::parse_from_rfc3339(&iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_general(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc2822) {
        return Utc.timestamp_opt(dt.unix_timestamp(), 0).single();
    }
    // chrono accepts the obsolete zone names (GMT, UT) some feeds still emit
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Strip HTML down to plain text: entity decode, tag removal, whitespace
/// collapse. Truncation stays a presentation concern.
pub fn strip_html(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();
    let stripped = RE_TAGS.replace_all(&decoded, " ");
    RE_WS.replace_all(&stripped, " ").trim().to_string()
}
