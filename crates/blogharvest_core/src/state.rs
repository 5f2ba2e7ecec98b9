use crate::cursor::{PageCursor, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    ResolvingFeed,
    Paginating,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    phase: RunPhase,
    feed_url: Option<String>,
    cursor: PageCursor,
    page_size: u32,
    next_sequence: u64,
    pages_fetched: u32,
    pending_items: usize,
    max_pages: Option<u32>,
    debug: bool,
}

impl RunState {
    pub fn new(page_size: u32, debug: bool) -> Self {
        Self {
            phase: RunPhase::ResolvingFeed,
            feed_url: None,
            cursor: PageCursor::paginated(page_size),
            page_size,
            next_sequence: 1,
            pages_fetched: 0,
            pending_items: 0,
            max_pages: None,
            debug,
        }
    }

    /// Stop after `max_pages` pages even if the feed keeps returning entries.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Folder number the next submitted entry will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == RunPhase::Exhausted
    }

    pub(crate) fn debug(&self) -> bool {
        self.debug
    }

    pub(crate) fn start_paginating(&mut self, feed_url: String, paginated: bool) {
        self.cursor = if paginated {
            PageCursor::paginated(self.page_size)
        } else {
            PageCursor::single_page()
        };
        self.feed_url = Some(feed_url);
        self.phase = RunPhase::Paginating;
    }

    pub(crate) fn current_page_url(&self) -> Option<String> {
        self.feed_url
            .as_deref()
            .map(|feed| self.cursor.page_url(feed))
    }

    pub(crate) fn reserve_sequence(&mut self, count: usize) -> u64 {
        let first = self.next_sequence;
        self.next_sequence += count as u64;
        first
    }

    pub(crate) fn begin_page(&mut self, items: usize) {
        self.pages_fetched += 1;
        self.pending_items = items;
    }

    pub(crate) fn finish_page(&mut self) {
        self.cursor.advance(self.pending_items);
        self.pending_items = 0;
    }

    pub(crate) fn has_more_pages(&self) -> bool {
        if !self.cursor.is_paginated() {
            return false;
        }
        match self.max_pages {
            Some(limit) => self.pages_fetched < limit,
            None => true,
        }
    }

    pub(crate) fn exhaust(&mut self) {
        self.phase = RunPhase::Exhausted;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, false)
    }
}
