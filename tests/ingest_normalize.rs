// tests/ingest_normalize.rs
use chrono::{TimeZone, Utc};
use lfc_news_aggregator::ingest::normalize::{
    resolve_timestamp, strip_html, strip_query, upgrade_reach_resolution,
};

#[test]
fn reach_cdn_size_segment_is_rewritten() {
    assert_eq!(
        upgrade_reach_resolution("https://i2-prod.liverpool.com/a/s640/photo.jpg"),
        "https://i2-prod.liverpool.com/a/s1200/photo.jpg"
    );
    assert_eq!(
        upgrade_reach_resolution("https://i2-prod.liverpoolecho.co.uk/b/s98/x.jpg"),
        "https://i2-prod.liverpoolecho.co.uk/b/s1200/x.jpg"
    );
}

#[test]
fn guardian_query_string_is_removed() {
    assert_eq!(
        strip_query("https://i.guim.co.uk/img/a.jpg?width=300&quality=80"),
        "https://i.guim.co.uk/img/a.jpg"
    );
    assert_eq!(strip_query("https://i.guim.co.uk/img/a.jpg"), "https://i.guim.co.uk/img/a.jpg");
}

#[test]
fn bare_datetime_round_trips_as_utc() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    assert_eq!(
        resolve_timestamp("2024-01-15 10:30:00", now),
        Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
    );
}

#[test]
fn strip_html_is_display_ready() {
    assert_eq!(strip_html(""), "");
    assert_eq!(
        strip_html("<p>Quansah &amp; Bradley</p>\n<span>impress</span>"),
        "Quansah & Bradley impress"
    );
}
