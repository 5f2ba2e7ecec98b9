use std::collections::BTreeSet;

use engine_logging::engine_info;
use scraper::{Html, Selector};

use crate::decode::decode_apparent;
use crate::feed::parse_feed;
use crate::EngineContext;

/// Anchor classes that blog themes use for label/tag links.
const LABEL_ANCHOR_SELECTORS: &[&str] = &["category", "a.label", "a.tag", "a.category"];

/// Labels (tags/categories) advertised by `url`, unique and sorted.
///
/// Feed categories are preferred; otherwise label-like anchors of the page
/// markup are used. Fetch failures are recorded and yield no labels.
pub async fn fetch_labels(ctx: &EngineContext, url: &str) -> Vec<String> {
    engine_info!("Fetching available labels/tags from {}", url);
    let response = match ctx.client.get(url).await {
        Ok(response) if response.is_success() => response,
        Ok(response) => {
            ctx.report(format!(
                "Failed to fetch labels. Status code: {} for URL: {}",
                response.status, url
            ));
            return Vec::new();
        }
        Err(err) => {
            ctx.report(format!("Failed to fetch labels: {err} for URL: {url}"));
            return Vec::new();
        }
    };

    let mut labels = BTreeSet::new();
    if let Ok(page) = parse_feed(&response.bytes, &response.final_url) {
        labels.extend(
            page.all_categories()
                .filter(|label| !label.is_empty())
                .map(str::to_string),
        );
    }
    if labels.is_empty() {
        let decoded = decode_apparent(&response.bytes);
        labels = labels_from_markup(&decoded.text);
    }
    labels.into_iter().collect()
}

/// Text of `<category>` elements and of label-like anchors.
pub fn labels_from_markup(markup: &str) -> BTreeSet<String> {
    let document = Html::parse_document(markup);
    LABEL_ANCHOR_SELECTORS
        .iter()
        .filter_map(|raw| Selector::parse(raw).ok())
        .flat_map(|selector| {
            document
                .select(&selector)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|label| !label.is_empty())
        .collect()
}
