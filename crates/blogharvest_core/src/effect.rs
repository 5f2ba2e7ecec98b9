/// Persisted metadata format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and parse the feed page at `url`.
    FetchPage { url: String },
    /// Submit the fetched entries to the worker pool; entry `i` gets folder
    /// number `first_sequence + i`.
    ProcessPage { first_sequence: u64, count: usize },
    PersistMetadata { format: MetadataFormat },
}
