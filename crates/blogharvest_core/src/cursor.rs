use url::Url;

pub const DEFAULT_PAGE_SIZE: u32 = 500;
pub const FIRST_START_INDEX: u32 = 1;

/// Offset cursor over a feed. `start_index` is `None` for feeds that do not
/// support offset pagination; such feeds are fetched exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    start_index: Option<u32>,
    page_size: u32,
}

impl PageCursor {
    pub fn paginated(page_size: u32) -> Self {
        Self {
            start_index: Some(FIRST_START_INDEX),
            page_size,
        }
    }

    pub fn single_page() -> Self {
        Self {
            start_index: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn start_index(&self) -> Option<u32> {
        self.start_index
    }

    pub fn is_paginated(&self) -> bool {
        self.start_index.is_some()
    }

    /// URL of the page the cursor currently points at.
    ///
    /// Query parameters are only appended for a nonzero start index; an
    /// unparseable feed URL is returned unchanged.
    pub fn page_url(&self, feed_url: &str) -> String {
        let Some(start) = self.start_index.filter(|s| *s > 0) else {
            return feed_url.to_string();
        };
        match Url::parse(feed_url) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("start-index", &start.to_string())
                    .append_pair("max-results", &self.page_size.to_string());
                url.into()
            }
            Err(_) => feed_url.to_string(),
        }
    }

    /// Move past `items` entries.
    pub fn advance(&mut self, items: usize) {
        if let Some(start) = self.start_index.as_mut() {
            let step = u32::try_from(items).unwrap_or(u32::MAX);
            *start = start.saturating_add(step);
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::paginated(DEFAULT_PAGE_SIZE)
    }
}
