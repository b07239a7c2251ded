// src/config.rs
//! Process-wide configuration: the source registry, the keyword→tag table,
//! and the pipeline's few knobs. Everything is an explicit immutable struct
//! handed to the pipeline at construction; built-in defaults can be
//! overridden by a TOML file located via env var.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::ingest::relay::RelayConfig;
use crate::ingest::tags::TagRule;
use crate::ingest::types::{FeedShape, SourceDescriptor, SourceKind};

pub const DEFAULT_CONFIG_PATH: &str = "config/aggregator.toml";
pub const ENV_CONFIG_PATH: &str = "AGGREGATOR_CONFIG_PATH";

/// Shared illustrative image used when a source yields none.
const FALLBACK_IMAGE_URL: &str =
    "https://resources.premierleague.com/premierleague/photo/2018/01/10/5b36653b-1623-450c-9a00-0363b590c624/Liverpool-Logo.png";

const CALENDAR_URL: &str =
    "https://calendar.google.com/calendar/ical/p520al5mfgqq5m2a8pu021nv0c%40group.calendar.google.com/public/basic.ics";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub sources: Vec<SourceDescriptor>,
    pub tags: Vec<TagRule>,
    pub fallback_image_url: String,
    /// Club whose name decides home/away in fixture summaries.
    pub home_club: String,
    pub calendar_url: String,
    pub relay: RelayConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            tags: default_tag_rules(),
            fallback_image_url: FALLBACK_IMAGE_URL.to_string(),
            home_club: "Liverpool".to_string(),
            calendar_url: CALENDAR_URL.to_string(),
            relay: RelayConfig::default(),
        }
    }
}

impl AggregatorConfig {
    /// Load configuration using env var + fallbacks:
    /// 1) $AGGREGATOR_CONFIG_PATH
    /// 2) config/aggregator.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("AGGREGATOR_CONFIG_PATH points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading aggregator config from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("parsing aggregator config from {}", path.display()))
    }
}

fn source(name: &str, feed_url: &str, kind: SourceKind) -> SourceDescriptor {
    SourceDescriptor {
        name: name.to_string(),
        feed_url: feed_url.to_string(),
        kind,
        shape: FeedShape::Xml,
    }
}

fn default_sources() -> Vec<SourceDescriptor> {
    use SourceKind::{News, Podcast};
    vec![
        source("Liverpool.com", "https://www.liverpool.com/?service=rss", News),
        source(
            "The Guardian",
            "https://www.theguardian.com/football/liverpool/rss",
            News,
        ),
        source("Reddit", "https://www.reddit.com/r/LiverpoolFC/hot.rss", News),
        source("Anfield Watch", "https://www.anfieldwatch.co.uk/feed", News),
        source(
            "BBC Sport",
            "https://feeds.bbci.co.uk/sport/football/teams/liverpool/rss.xml",
            News,
        ),
        source(
            "Liverpool Echo",
            "https://www.liverpoolecho.co.uk/liverpool-fc/?service=rss",
            News,
        ),
        source("This Is Anfield", "https://www.thisisanfield.com/feed/", News),
        source(
            "Empire of the Kop",
            "https://www.empireofthekop.com/feed/",
            News,
        ),
        source(
            "Walk On",
            "https://feeds.acast.com/public/shows/walk-on-the-athletic-fcs-liverpool-show",
            Podcast,
        ),
        source(
            "The Anfield Wrap",
            "https://feeds.megaphone.fm/COMG6516013185",
            Podcast,
        ),
    ]
}

/// Keyword table for auto-tagging. Order matters: the first four matching
/// labels survive the per-item cap.
fn default_tag_rules() -> Vec<TagRule> {
    vec![
        // Players
        TagRule::new("Arne Slot", &["slot", "head coach", "manager"]),
        TagRule::new("Mohamed Salah", &["salah", "mo salah", "egyptian king"]),
        TagRule::new("Virgil van Dijk", &["van dijk", "virgil", "vvd"]),
        TagRule::new("Trent Alexander-Arnold", &["trent", "alexander-arnold", "taa"]),
        TagRule::new("Darwin Nunez", &["nunez", "darwin"]),
        TagRule::new("Luis Diaz", &["diaz", "lucho"]),
        TagRule::new("Dominik Szoboszlai", &["szoboszlai", "dom"]),
        TagRule::new("Alexis Mac Allister", &["mac allister", "macca"]),
        TagRule::new("Alisson Becker", &["alisson", "becker"]),
        TagRule::new("Ryan Gravenberch", &["gravenberch"]),
        TagRule::new("Ibrahima Konate", &["konate", "ibou"]),
        TagRule::new("Diogo Jota", &["jota", "diogo"]),
        TagRule::new("Cody Gakpo", &["gakpo", "cody"]),
        TagRule::new("Andy Robertson", &["robertson", "robbo"]),
        TagRule::new("Curtis Jones", &["curtis jones", "curtis"]),
        TagRule::new("Harvey Elliott", &["elliott", "harvey"]),
        TagRule::new("Caoimhin Kelleher", &["kelleher", "caoimhin"]),
        TagRule::new("Wataru Endo", &["endo", "wataru"]),
        TagRule::new("Jarell Quansah", &["quansah"]),
        TagRule::new("Conor Bradley", &["bradley"]),
        TagRule::new("Kostas Tsimikas", &["tsimikas", "kostas"]),
        TagRule::new("Joe Gomez", &["gomez", "joe"]),
        TagRule::new("Federico Chiesa", &["chiesa"]),
        TagRule::new("Alexander Isak", &["isak", "alexander isak"]),
        // Topics
        TagRule::new(
            "Transfers",
            &["transfer", "signing", "bid", "target", "rumour", "gossip", "deal"],
        ),
        TagRule::new("Premier League", &["premier league", "pl", "league table"]),
        TagRule::new("Champions League", &["champions league", "ucl", "europe"]),
        TagRule::new("Carabao Cup", &["carabao cup", "league cup"]),
        TagRule::new("FA Cup", &["fa cup"]),
        TagRule::new("Academy", &["academy", "u21", "u18", "youth", "nyoni", "danns"]),
        TagRule::new("Injuries", &["injury", "injured", "fitness", "sidelined"]),
        TagRule::new(
            "FSG",
            &["fsg", "fenway", "henry", "owners", "edwards", "hughes"],
        ),
        TagRule::new(
            "Match Report",
            &["match report", "player ratings", "verdict", "analysis"],
        ),
        TagRule::new("Interviews", &["interview", "quotes", "spoke to"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_full_registry() {
        let config = AggregatorConfig::default();
        assert_eq!(config.sources.len(), 10);
        assert_eq!(
            config
                .sources
                .iter()
                .filter(|s| s.kind == SourceKind::Podcast)
                .count(),
            2
        );
        assert!(config.sources.iter().all(|s| s.shape == FeedShape::Xml));
        assert!(!config.tags.is_empty());
        assert_eq!(config.home_club, "Liverpool");
    }

    #[test]
    fn toml_override_keeps_defaults_for_missing_fields() {
        let toml = r#"
            home_club = "Everton"

            [[sources]]
            name = "Toffees Feed"
            feed_url = "https://example.test/feed"
            kind = "news"
            shape = "flattened-json"
        "#;
        let config: AggregatorConfig = toml::from_str(toml).expect("valid toml");
        assert_eq!(config.home_club, "Everton");
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].shape, FeedShape::FlattenedJson);
        // untouched sections fall back to defaults
        assert_eq!(config.fallback_image_url, FALLBACK_IMAGE_URL);
        assert!(!config.tags.is_empty());
    }
}
