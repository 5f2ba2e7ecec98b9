use chrono::{DateTime, FixedOffset, Utc};
use engine_logging::{engine_debug, engine_info};
use url::Url;

use crate::{EngineContext, FetchError};

const UNTITLED: &str = "Untitled";

/// One syndicated item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    /// Absolute post URL.
    pub link: String,
    pub published: Option<DateTime<FixedOffset>>,
    pub categories: Vec<String>,
}

impl FeedEntry {
    /// Publication time, or the current time when the feed had none.
    pub fn published_or_now(&self) -> DateTime<FixedOffset> {
        self.published
            .unwrap_or_else(|| Utc::now().fixed_offset())
    }
}

/// One parsed feed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedPage {
    pub entries: Vec<FeedEntry>,
    /// Items in the document, including the ones without a usable link.
    pub item_count: usize,
    /// Feed-level categories.
    pub categories: Vec<String>,
}

impl FeedPage {
    /// Feed-level and entry-level categories, in document order.
    pub fn all_categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .chain(self.entries.iter().flat_map(|e| e.categories.iter()))
            .map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to fetch feed: {0}")]
    Fetch(#[from] FetchError),
    #[error("feed returned HTTP {0}")]
    Status(u16),
    #[error("malformed feed (RSS: {rss}; Atom: {atom})")]
    Malformed { rss: String, atom: String },
}

/// Fetch and parse the feed page at `url`.
pub async fn fetch_feed_page(ctx: &EngineContext, url: &str) -> Result<FeedPage, FeedError> {
    engine_info!("Fetching RSS feed: {}", url);
    let response = ctx.client.get(url).await?;
    if !response.is_success() {
        return Err(FeedError::Status(response.status));
    }
    parse_feed(&response.bytes, &response.final_url)
}

/// Parse RSS 2.0, falling back to Atom. Relative item links are resolved
/// against `base_url`; items without a resolvable link are dropped.
pub fn parse_feed(bytes: &[u8], base_url: &str) -> Result<FeedPage, FeedError> {
    let base = Url::parse(base_url).ok();
    match parse_as_rss(bytes, base.as_ref()) {
        Ok(page) => Ok(page),
        Err(rss_err) => {
            engine_debug!("Failed to parse as RSS: {}, trying Atom", rss_err);
            parse_as_atom(bytes, base.as_ref()).map_err(|atom_err| FeedError::Malformed {
                rss: rss_err.to_string(),
                atom: atom_err.to_string(),
            })
        }
    }
}

fn parse_as_rss(bytes: &[u8], base: Option<&Url>) -> Result<FeedPage, rss::Error> {
    let channel = rss::Channel::read_from(bytes)?;

    let entries = channel
        .items()
        .iter()
        .filter_map(|item| {
            let link = absolute_link(item.link()?, base)?;
            let published = item
                .pub_date()
                .and_then(parse_date)
                .or_else(|| {
                    item.dublin_core_ext()
                        .and_then(|dc| dc.dates().first())
                        .and_then(|d| parse_date(d))
                });
            Some(FeedEntry {
                title: entry_title(item.title()),
                link,
                published,
                categories: item
                    .categories()
                    .iter()
                    .map(|c| c.name().trim().to_string())
                    .collect(),
            })
        })
        .collect();

    Ok(FeedPage {
        entries,
        item_count: channel.items().len(),
        categories: channel
            .categories()
            .iter()
            .map(|c| c.name().trim().to_string())
            .collect(),
    })
}

fn parse_as_atom(bytes: &[u8], base: Option<&Url>) -> Result<FeedPage, atom_syndication::Error> {
    let feed = atom_syndication::Feed::read_from(bytes)?;

    let entries = feed
        .entries()
        .iter()
        .filter_map(|entry| {
            let href = entry
                .links()
                .iter()
                .find(|link| link.rel() == "alternate")
                .or_else(|| entry.links().first())
                .map(|link| link.href())?;
            let link = absolute_link(href, base)?;
            let published = entry.published().copied();
            Some(FeedEntry {
                title: entry_title(Some(entry.title().as_str())),
                link,
                published,
                categories: entry
                    .categories()
                    .iter()
                    .map(|c| c.term().trim().to_string())
                    .collect(),
            })
        })
        .collect();

    Ok(FeedPage {
        entries,
        item_count: feed.entries().len(),
        categories: feed
            .categories()
            .iter()
            .map(|c| c.term().trim().to_string())
            .collect(),
    })
}

fn entry_title(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => UNTITLED.to_string(),
    }
}

fn absolute_link(raw: &str, base: Option<&Url>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url.into());
    }
    base.and_then(|base| base.join(trimmed).ok()).map(String::from)
}

/// RFC 2822 (RSS) or RFC 3339 (Atom, Dublin Core).
fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}
