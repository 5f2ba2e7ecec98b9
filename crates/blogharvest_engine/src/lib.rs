//! Blogharvest engine: HTTP, parsing, exporting and the run orchestrator.
mod classify;
mod context;
mod decode;
mod export;
mod extract;
mod feed;
mod fetch;
mod harvester;
mod images;
mod labels;
mod metadata;
mod persist;
mod pipeline;
mod post;
mod resolve;
mod retry;
mod tree;
mod types;
mod xhtml;

pub use classify::{classify_site, probe_blogger_feed};
pub use context::EngineContext;
pub use decode::{decode_apparent, DecodedText};
pub use export::{
    build_exporter, EpubExporter, ExportError, Exporter, PdfExporter, TextExporter,
};
pub use extract::{ContainerExtractor, ExtractedContent, Extractor, CONTAINER_CLASSES};
pub use feed::{fetch_feed_page, parse_feed, FeedEntry, FeedError, FeedPage};
pub use fetch::{FetchSettings, HttpClient, ReqwestClient};
pub use harvester::{
    HarvestError, Harvester, RunOptions, RunSummary, DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR,
};
pub use images::{collect_image_urls, download_images, ImageDownloadReport};
pub use labels::{fetch_labels, labels_from_markup};
pub use metadata::{
    save_metadata, to_csv, to_json, MetadataError, PostRecord, METADATA_CSV, METADATA_JSON,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::PostPipeline;
pub use post::{fetch_post, FetchedPost};
pub use resolve::{resolve_feed, ResolvedFeed};
pub use retry::RetryPolicy;
pub use tree::{ContentTree, MarkupKind};
pub use types::{FailureKind, FetchError, HttpResponse};
pub use xhtml::{to_xhtml, XhtmlSerializer};
