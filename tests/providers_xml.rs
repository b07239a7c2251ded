// tests/providers_xml.rs
use lfc_news_aggregator::ingest::providers::xml_feed::parse_xml_feed;
use std::fs;

#[test]
fn parses_reach_style_rss_fixture() {
    let xml = fs::read_to_string("tests/fixtures/liverpool_rss.xml").expect("fixture");
    let items = parse_xml_feed(&xml).expect("ok");

    assert_eq!(items.len(), 3);

    let first = &items[0];
    assert_eq!(
        first.title,
        "Arne Slot delivers team news update ahead of Fulham clash"
    );
    assert_eq!(
        first.link,
        "https://www.liverpool.com/liverpool-fc-news/team-news-update"
    );
    assert_eq!(first.pub_date.as_deref(), Some("Mon, 15 Jan 2024 09:00:00 GMT"));
    assert_eq!(first.enclosure_type.as_deref(), Some("image/jpeg"));
    assert!(first
        .enclosure_url
        .as_deref()
        .unwrap()
        .contains("/s615/slot.jpg"));
    assert!(first.content.as_deref().unwrap().contains("Full article body"));

    // second entry carries its image only inside the description html
    let second = &items[1];
    assert!(second.enclosure_url.is_none());
    assert!(second.description.as_deref().unwrap().contains("<img src="));

    // third entry has no usable title; parsing still surfaces it raw
    assert!(items[2].title.is_empty());
}

#[test]
fn parses_reddit_style_atom_fixture() {
    let xml = fs::read_to_string("tests/fixtures/reddit_atom.xml").expect("fixture");
    let items = parse_xml_feed(&xml).expect("ok");

    assert_eq!(items.len(), 2);

    let post_match = &items[0];
    assert_eq!(
        post_match.link,
        "https://www.reddit.com/r/LiverpoolFC/comments/postmatch"
    );
    // published outranks updated
    assert_eq!(
        post_match.pub_date.as_deref(),
        Some("2024-01-14T19:05:00+00:00")
    );
    assert_eq!(post_match.thumbnail.as_deref(), Some("self"));

    let gallery = &items[1];
    // no published element: updated is the fallback
    assert_eq!(gallery.pub_date.as_deref(), Some("2024-01-13T11:30:00+00:00"));
    assert_eq!(
        gallery.thumbnail.as_deref(),
        Some("https://b.thumbs.redditmedia.com/training.jpg")
    );
}
