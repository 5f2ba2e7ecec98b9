use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use blogharvest_core::{
    update, Effect, ExportMode, MetadataFormat, Msg, RunState, DEFAULT_PAGE_SIZE,
};
use engine_logging::{engine_info, engine_warn, FailureSink};
use futures_util::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::export::{build_exporter, ExportError, Exporter};
use crate::extract::ContainerExtractor;
use crate::feed::{fetch_feed_page, FeedEntry};
use crate::fetch::{FetchSettings, ReqwestClient};
use crate::metadata::{save_metadata, PostRecord};
use crate::persist::{ensure_output_dir, PersistError};
use crate::pipeline::PostPipeline;
use crate::resolve::{resolve_feed, ResolvedFeed};
use crate::{EngineContext, FetchError};

pub const DEFAULT_OUTPUT_DIR: &str = "downloaded_posts";
pub const DEFAULT_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub mode: ExportMode,
    pub download_images: bool,
    /// Also rewrite `metadata.csv` after every page.
    pub debug: bool,
    /// Posts processed at the same time.
    pub concurrency: usize,
    pub page_size: u32,
    pub max_pages: Option<u32>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            mode: ExportMode::Txt,
            download_images: false,
            debug: false,
            concurrency: DEFAULT_CONCURRENCY,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
        }
    }
}

/// Startup failures. Everything after startup is recorded and skipped.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("cannot prepare output directory: {0}")]
    OutputDir(#[from] PersistError),
    #[error("cannot build HTTP client: {0}")]
    Client(#[from] FetchError),
    #[error(transparent)]
    Exporter(#[from] ExportError),
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub feed: ResolvedFeed,
    pub pages: u32,
    /// Completion order.
    pub records: Vec<PostRecord>,
    pub metadata_path: Option<PathBuf>,
}

/// Drives one export run: the core state machine decides, this executes the
/// effects it asks for.
pub struct Harvester {
    ctx: EngineContext,
    exporter: Arc<dyn Exporter>,
    extractor: Arc<ContainerExtractor>,
    options: RunOptions,
}

impl Harvester {
    pub fn new(ctx: EngineContext, exporter: Arc<dyn Exporter>, options: RunOptions) -> Self {
        Self {
            ctx,
            exporter,
            extractor: Arc::new(ContainerExtractor::new()),
            options,
        }
    }

    /// Production wiring: reqwest client from `settings`, exporter for the
    /// configured mode.
    pub fn from_settings(
        options: RunOptions,
        settings: FetchSettings,
        failures: Arc<dyn FailureSink>,
        wkhtmltopdf: Option<&Path>,
    ) -> Result<Self, HarvestError> {
        let client = ReqwestClient::new(settings)?;
        let exporter: Arc<dyn Exporter> = Arc::from(build_exporter(options.mode, wkhtmltopdf)?);
        let ctx = EngineContext::new(Arc::new(client), failures);
        Ok(Self::new(ctx, exporter, options))
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub async fn resolve(&self, base_url: &str) -> ResolvedFeed {
        resolve_feed(&self.ctx, base_url).await
    }

    /// Resolve `base_url` to a feed and export every post in it.
    pub async fn run(&self, base_url: &str) -> Result<RunSummary, HarvestError> {
        let feed = self.resolve(base_url).await;
        self.run_feed(feed).await
    }

    /// Export every post of an already resolved feed.
    pub async fn run_feed(&self, feed: ResolvedFeed) -> Result<RunSummary, HarvestError> {
        if self.options.concurrency == 0 {
            return Err(HarvestError::InvalidConcurrency);
        }
        ensure_output_dir(&self.options.output_dir)?;

        let pipeline = PostPipeline {
            ctx: self.ctx.clone(),
            exporter: self.exporter.clone(),
            extractor: self.extractor.clone(),
            platform: feed.platform,
            output_dir: self.options.output_dir.clone(),
            download_images: self.options.download_images,
        };

        let mut state = RunState::new(self.options.page_size, self.options.debug)
            .with_max_pages(self.options.max_pages);
        let mut inbox = VecDeque::from([Msg::FeedResolved {
            feed_url: feed.url.clone(),
            paginated: feed.paginated(),
        }]);
        let mut page_entries: Vec<FeedEntry> = Vec::new();
        let mut records: Vec<PostRecord> = Vec::new();
        let mut metadata_path = None;

        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;

            for effect in effects {
                match effect {
                    Effect::FetchPage { url } => match fetch_feed_page(&self.ctx, &url).await {
                        Ok(page) => {
                            engine_info!(
                                "Page {}: {} entries",
                                state.pages_fetched() + 1,
                                page.entries.len()
                            );
                            inbox.push_back(Msg::PageFetched {
                                items: page.item_count,
                                entries: page.entries.len(),
                            });
                            page_entries = page.entries;
                        }
                        Err(err) => {
                            self.ctx
                                .report(format!("Error fetching RSS feed: {err} for URL: {url}"));
                            inbox.push_back(Msg::PageFailed);
                        }
                    },
                    Effect::ProcessPage {
                        first_sequence,
                        count,
                    } => {
                        let entries = std::mem::take(&mut page_entries);
                        if entries.len() != count {
                            engine_warn!("expected {} entries, have {}", count, entries.len());
                        }
                        let done = self.process_page(&pipeline, first_sequence, entries).await;
                        records.extend(done);
                        inbox.push_back(Msg::PageJoined);
                    }
                    Effect::PersistMetadata { format } => {
                        match save_metadata(&records, &self.options.output_dir, format) {
                            Ok(path) if format == MetadataFormat::Json => {
                                metadata_path = Some(path)
                            }
                            Ok(_) => {}
                            Err(err) => self.ctx.report(format!("Error saving metadata: {err}")),
                        }
                    }
                }
            }
        }

        engine_info!(
            "No more posts to scrape. {} posts exported from {} page(s)",
            records.len(),
            state.pages_fetched()
        );
        Ok(RunSummary {
            feed,
            pages: state.pages_fetched(),
            records,
            metadata_path,
        })
    }

    /// Submit every entry of a page, then wait for all of them. Records are
    /// collected as tasks finish.
    async fn process_page(
        &self,
        pipeline: &PostPipeline,
        first_sequence: u64,
        entries: Vec<FeedEntry>,
    ) -> Vec<PostRecord> {
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency));
        let mut tasks = FuturesUnordered::new();

        for (sequence, entry) in (first_sequence..).zip(entries) {
            let pipeline = pipeline.clone();
            let semaphore = semaphore.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                pipeline.process(sequence, entry).await
            }));
        }

        let mut records = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) => self.ctx.report(format!("Post task failed: {err}")),
            }
        }
        records
    }
}
