use url::Url;

const BLOGGER_FEED_PATH: &str = "/feeds/posts/default";

/// Feed URL listing only the posts carrying `label`.
///
/// Blogger feeds become `<feed>/-/<label>?alt=rss`; anything else falls back
/// to the `search/label` convention of the site root.
pub fn label_feed_url(feed_url: &str, label: &str) -> String {
    let encoded = encode_label(label);
    let without_query = feed_url.split('?').next().unwrap_or(feed_url);

    if let Some(idx) = without_query.find(BLOGGER_FEED_PATH) {
        let feed_base = &without_query[..idx + BLOGGER_FEED_PATH.len()];
        return format!("{feed_base}/-/{encoded}?alt=rss");
    }

    let root = Url::parse(feed_url)
        .ok()
        .and_then(|url| url.join("/").ok())
        .map(String::from)
        .unwrap_or_else(|| without_query.to_string());
    format!("{}/search/label/{encoded}?alt=rss", root.trim_end_matches('/'))
}

fn encode_label(label: &str) -> String {
    urlencoding::encode(label.trim()).into_owned()
}
