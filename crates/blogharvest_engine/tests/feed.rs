mod common;

use blogharvest_engine::{fetch_feed_page, parse_feed, FeedError};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE: &str = "https://blog.example/feed";

#[test]
fn rss_items_become_entries() {
    let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>B</title><link>https://blog.example/</link><description>d</description>
<category>Channel</category>
<item><title> First </title><link>https://blog.example/first</link>
<pubDate>Tue, 02 Jan 2024 09:30:00 +0700</pubDate><category>Travel</category></item>
<item><title></title><link>/relative</link></item>
<item><title>No link</title></item>
</channel></rss>"#;

    let page = parse_feed(xml.as_bytes(), BASE).unwrap();

    assert_eq!(page.item_count, 3);
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].title, "First");
    assert_eq!(page.entries[0].link, "https://blog.example/first");
    assert_eq!(
        page.entries[0].published.map(|d| d.to_rfc3339()),
        Some("2024-01-02T09:30:00+07:00".to_string())
    );
    assert_eq!(page.entries[1].title, "Untitled");
    assert_eq!(page.entries[1].link, "https://blog.example/relative");
    assert_eq!(page.entries[1].published, None);
    assert_eq!(page.all_categories().collect::<Vec<_>>(), vec!["Channel", "Travel"]);
}

#[test]
fn atom_is_accepted_when_rss_fails() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>B</title><id>urn:b</id><updated>2024-02-01T00:00:00Z</updated>
  <entry>
    <title>Atom post</title><id>urn:1</id>
    <updated>2024-02-01T00:00:00Z</updated><published>2024-01-15T12:00:00Z</published>
    <link rel="replies" href="https://blog.example/comments"/>
    <link rel="alternate" href="https://blog.example/atom-post"/>
    <category term="Food"/>
  </entry>
</feed>"#;

    let page = parse_feed(xml.as_bytes(), BASE).unwrap();

    assert_eq!(page.item_count, 1);
    let entry = &page.entries[0];
    assert_eq!(entry.link, "https://blog.example/atom-post");
    assert_eq!(
        entry.published.map(|d| d.to_rfc3339()),
        Some("2024-01-15T12:00:00+00:00".to_string())
    );
    assert_eq!(entry.categories, vec!["Food".to_string()]);
}

#[test]
fn atom_entry_without_published_ignores_updated() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>B</title><id>urn:b</id><updated>2020-01-01T00:00:00Z</updated>
  <entry>
    <title>Undated</title><id>urn:2</id>
    <updated>2020-01-01T00:00:00Z</updated>
    <link href="https://blog.example/undated"/>
  </entry>
</feed>"#;

    let page = parse_feed(xml.as_bytes(), BASE).unwrap();

    let entry = &page.entries[0];
    assert_eq!(entry.published, None);
    let before = chrono::Utc::now();
    assert!(entry.published_or_now() >= before);
}

#[test]
fn html_is_malformed() {
    let err = parse_feed(b"<html><body>nope</body></html>", BASE).unwrap_err();
    assert!(matches!(err, FeedError::Malformed { .. }));
}

#[test]
fn empty_channel_has_no_items() {
    let page = parse_feed(common::rss(&[]).as_bytes(), BASE).unwrap();
    assert_eq!(page.item_count, 0);
    assert!(page.entries.is_empty());
}

#[tokio::test]
async fn fetch_rejects_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let (ctx, _) = common::context();
    let err = fetch_feed_page(&ctx, &format!("{}/feed", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Status(410)));
}

#[tokio::test]
async fn fetch_parses_served_feed() {
    let server = MockServer::start().await;
    let body = common::rss(&[("One", "https://blog.example/1"), ("Two", "https://blog.example/2")]);
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/rss+xml"))
        .mount(&server)
        .await;

    let (ctx, _) = common::context();
    let page = fetch_feed_page(&ctx, &format!("{}/feed", server.uri()))
        .await
        .unwrap();
    let titles: Vec<_> = page.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two"]);
}
