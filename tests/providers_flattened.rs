// tests/providers_flattened.rs
use lfc_news_aggregator::ingest::providers::flattened_json::{raw_items, FlattenedFeed};
use std::fs;

#[test]
fn parses_flattened_fixture() {
    let json = fs::read_to_string("tests/fixtures/flattened_feed.json").expect("fixture");
    let feed: FlattenedFeed = serde_json::from_str(&json).expect("envelope json");
    let items = raw_items(feed);

    assert_eq!(items.len(), 2);

    let boost = &items[0];
    assert_eq!(boost.title, "Liverpool handed double injury boost before derby");
    assert_eq!(boost.link, "https://www.anfieldwatch.co.uk/injury-boost");
    assert_eq!(boost.pub_date.as_deref(), Some("2024-01-15 10:30:00"));
    assert_eq!(
        boost.media_url.as_deref(),
        Some("https://www.anfieldwatch.co.uk/images/training.jpg")
    );

    // missing link falls back to the enclosure link; empty thumbnail is no hint
    let episode = &items[1];
    assert_eq!(episode.link, "https://cdn.example.net/episodes/42.mp3");
    assert!(episode.media_url.is_none());
}

#[test]
fn non_ok_envelope_contributes_nothing() {
    let feed: FlattenedFeed =
        serde_json::from_str(r#"{"status":"error","message":"rate limited"}"#).expect("json");
    assert!(raw_items(feed).is_empty());
}
