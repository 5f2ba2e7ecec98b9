use std::path::PathBuf;
use std::sync::Arc;

use blogharvest_core::{document_filename, post_folder_name, site_folder_name, Platform};
use engine_logging::{engine_debug, engine_info};
use url::Url;

use crate::export::Exporter;
use crate::extract::{ContainerExtractor, ExtractedContent, Extractor};
use crate::feed::FeedEntry;
use crate::images::download_images;
use crate::metadata::PostRecord;
use crate::post::fetch_post;
use crate::tree::ContentTree;
use crate::EngineContext;

const IMAGES_DIR: &str = "images";

/// Everything a post task needs; shared by all tasks of a run.
#[derive(Clone)]
pub struct PostPipeline {
    pub ctx: EngineContext,
    pub exporter: Arc<dyn Exporter>,
    pub extractor: Arc<ContainerExtractor>,
    pub platform: Platform,
    pub output_dir: PathBuf,
    pub download_images: bool,
}

impl PostPipeline {
    /// Fetch, extract, optionally download images, and export one entry into
    /// `<output>/<site>/<sequence> - <title>/`.
    ///
    /// Returns `None` when the post could not be fetched or its folder could
    /// not be created. Export failures are recorded but the post still counts.
    pub async fn process(&self, sequence: u64, entry: FeedEntry) -> Option<PostRecord> {
        let fetched = fetch_post(&self.ctx, &entry.link).await?;
        engine_debug!(
            "post {} decoded as {} ({:?})",
            sequence,
            fetched.encoding_label,
            fetched.kind
        );

        let content: ExtractedContent = {
            let tree = ContentTree::parse(&fetched.markup, fetched.kind);
            let base = Url::parse(&entry.link).ok();
            self.extractor.extract(&tree, self.platform, base.as_ref())
        };

        let post_folder = self
            .output_dir
            .join(site_folder_name(&entry.link))
            .join(post_folder_name(sequence, &entry.title));
        if let Err(err) = tokio::fs::create_dir_all(&post_folder).await {
            self.ctx.report(format!(
                "Error creating folder {}: {err}",
                post_folder.display()
            ));
            return None;
        }

        let images_folder = if self.download_images {
            let folder = post_folder.join(IMAGES_DIR);
            match tokio::fs::create_dir_all(&folder).await {
                Ok(()) => {
                    let report = download_images(&self.ctx, &content.image_urls, &folder).await;
                    engine_debug!(
                        "post {}: {} images saved, {} skipped, {} failed",
                        sequence,
                        report.saved.len(),
                        report.skipped,
                        report.failed
                    );
                    Some(folder)
                }
                Err(err) => {
                    self.ctx.report(format!(
                        "Error creating folder {}: {err}",
                        folder.display()
                    ));
                    None
                }
            }
        } else {
            None
        };

        let output =
            post_folder.join(document_filename(&entry.title, self.exporter.extension()));
        match self
            .exporter
            .export(&content.markup, &entry.title, &output, images_folder.as_deref())
            .await
        {
            Ok(()) => engine_info!("Saved: {}", output.display()),
            Err(err) => self.ctx.report(format!(
                "Error exporting post: {err} for file: {}",
                output.display()
            )),
        }

        let published = entry.published_or_now();
        Some(PostRecord::new(
            entry.title,
            entry.link,
            published,
            content.has_post_body,
        ))
    }
}
