mod common;

use std::fs;

use blogharvest_core::Platform;
use blogharvest_engine::{
    collect_image_urls, download_images, ContainerExtractor, ContentTree, Extractor, MarkupKind,
};
use pretty_assertions::assert_eq;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POST: &str = r#"<html><body>
<img src="/banner.png">
<div class="post-body"><p>Hello</p><img src="inline/cat.jpg"></div>
</body></html>"#;

fn post_url() -> Url {
    Url::parse("https://blog.example/2024/01/post.html").unwrap()
}

#[test]
fn blogger_container_is_exported_with_its_images() {
    let tree = ContentTree::parse(POST, MarkupKind::Html);
    let content = ContainerExtractor::new().extract(&tree, Platform::Blogger, Some(&post_url()));

    assert!(content.has_post_body);
    assert!(content.markup.starts_with("<div class=\"post-body\">"));
    assert!(!content.markup.contains("banner"));
    assert_eq!(
        content.image_urls,
        vec![Url::parse("https://blog.example/2024/01/inline/cat.jpg").unwrap()]
    );
}

#[test]
fn blogger_without_container_exports_whole_page() {
    let tree = ContentTree::parse("<html><body><p>bare</p></body></html>", MarkupKind::Html);
    let content = ContainerExtractor::new().extract(&tree, Platform::Blogger, None);

    assert!(!content.has_post_body);
    assert!(content.markup.starts_with("<html>"));
    assert!(content.markup.contains("<p>bare</p>"));
}

#[test]
fn other_platforms_export_whole_page_and_all_images() {
    let tree = ContentTree::parse(POST, MarkupKind::Html);
    let content =
        ContainerExtractor::new().extract(&tree, Platform::WordPress, Some(&post_url()));

    assert!(content.has_post_body);
    assert!(content.markup.contains("banner.png"));
    assert_eq!(content.image_urls.len(), 2);
    assert_eq!(content.image_urls[0].as_str(), "https://blog.example/banner.png");
}

#[test]
fn xml_posts_are_not_wrapped_in_a_document() {
    let tree = ContentTree::parse("<entry><p>x</p></entry>", MarkupKind::Xml);
    let content = ContainerExtractor::new().extract(&tree, Platform::Unknown, None);
    assert_eq!(content.markup, "<entry><p>x</p></entry>");
}

#[test]
fn xhtml_self_closing_container_does_not_absorb_siblings() {
    let xhtml = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><body><div class="post-body"/><p>sidebar</p><img src="side.png"/></body></html>"#;
    let tree = ContentTree::parse(xhtml, MarkupKind::Xml);
    let content = ContainerExtractor::new().extract(&tree, Platform::Blogger, Some(&post_url()));

    assert!(content.has_post_body);
    assert_eq!(content.markup, r#"<div class="post-body"></div>"#);
    assert!(content.image_urls.is_empty());
}

#[test]
fn image_collection_skips_empty_and_inline_sources() {
    let tree = ContentTree::parse(
        r#"<img src=""><img src="data:image/png;base64,AA"><img src="a.gif"><img src="a.gif">"#,
        MarkupKind::Html,
    );
    let urls = collect_image_urls(tree.root(), Some(&post_url()));
    assert_eq!(
        urls,
        vec![Url::parse("https://blog.example/2024/01/a.gif").unwrap()]
    );
}

#[tokio::test]
async fn only_supported_images_are_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/photo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/logo.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg/>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (ctx, sink) = common::context();
    let urls = vec![
        Url::parse(&format!("{}/img/logo.svg", server.uri())).unwrap(),
        Url::parse(&format!("{}/img/photo.png?size=large", server.uri())).unwrap(),
    ];

    let report = download_images(&ctx, &urls, dir.path()).await;

    assert_eq!(report.saved, vec![dir.path().join("photo.png")]);
    assert_eq!(report.skipped, 1);
    assert_eq!(fs::read(dir.path().join("photo.png")).unwrap(), b"png-bytes");
    assert!(!dir.path().join("logo.svg").exists());
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn single_svg_downloads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _) = common::context();
    let urls = vec![Url::parse("http://127.0.0.1:9/only.svg").unwrap()];

    let report = download_images(&ctx, &urls, dir.path()).await;

    assert!(report.saved.is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn failed_images_are_recorded_and_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpg".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (ctx, sink) = common::context();
    let urls = vec![
        Url::parse(&format!("{}/gone.jpg", server.uri())).unwrap(),
        Url::parse(&format!("{}/ok.jpg", server.uri())).unwrap(),
    ];

    let report = download_images(&ctx, &urls, dir.path()).await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.saved.len(), 1);
    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("gone.jpg"));
}
