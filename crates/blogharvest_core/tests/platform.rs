use blogharvest_core::{
    classify_markup, feed_candidates, join_feed_path, PageCursor, Platform, BLOGGER_FEED_SUFFIX,
};
use pretty_assertions::assert_eq;

#[test]
fn blogspot_url_wins_even_without_markup() {
    assert_eq!(
        classify_markup("https://x.blogspot.com", "<html></html>"),
        Platform::Blogger
    );
}

#[test]
fn markers_are_checked_in_priority_order() {
    let both = r#"<script src="https://www.Blogger.com/x.js"></script><link href="/wp-content/a.css">"#;
    assert_eq!(classify_markup("https://x.example", both), Platform::Blogger);
    assert_eq!(
        classify_markup("https://x.example", r#"<link href="/wp-content/a.css">"#),
        Platform::WordPress
    );
    assert_eq!(
        classify_markup("https://x.example", "Powered by Joomla!"),
        Platform::Joomla
    );
    assert_eq!(
        classify_markup("https://x.example", "<script>Drupal.settings</script>"),
        Platform::Drupal
    );
    assert_eq!(
        classify_markup("https://x.example", "<p>plain</p>"),
        Platform::Unknown
    );
}

#[test]
fn candidates_per_platform() {
    assert_eq!(feed_candidates(Platform::WordPress), &["/feed/", "/comments/feed/"]);
    assert_eq!(feed_candidates(Platform::Drupal), &["/rss.xml"]);
    assert_eq!(
        feed_candidates(Platform::Unknown),
        &["/feed/", "/rss.xml", "/atom.xml", "/feeds/"]
    );
    assert!(feed_candidates(Platform::Blogger).is_empty());
}

#[test]
fn blogger_probe_url() {
    assert_eq!(
        join_feed_path("https://blog.example/", BLOGGER_FEED_SUFFIX),
        "https://blog.example/feeds/posts/default?alt=rss"
    );
}

#[test]
fn cursor_only_appends_query_when_paginated() {
    let single = PageCursor::single_page();
    assert_eq!(single.page_url("https://w.example/feed/"), "https://w.example/feed/");

    let mut paged = PageCursor::paginated(25);
    assert_eq!(
        paged.page_url("https://w.example/feed"),
        "https://w.example/feed?start-index=1&max-results=25"
    );
    paged.advance(25);
    assert_eq!(paged.start_index(), Some(26));
}
