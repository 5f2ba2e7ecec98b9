#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The feed endpoint is known.
    FeedResolved { feed_url: String, paginated: bool },
    /// A page parsed. `items` counts every item of the document, `entries`
    /// only those that can be processed.
    PageFetched { items: usize, entries: usize },
    /// The page could not be fetched or was not a feed.
    PageFailed,
    /// Every task of the current page has completed.
    PageJoined,
}
