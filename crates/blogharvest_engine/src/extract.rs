use blogharvest_core::Platform;
use scraper::{ElementRef, Selector};
use url::Url;

use crate::images::collect_image_urls;
use crate::tree::ContentTree;

/// Class names of the elements that hold a post body, in lookup order.
pub const CONTAINER_CLASSES: &[&str] = &["post-body", "entry-content", "post-entry"];

/// Exportable part of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub markup: String,
    /// False only for Blogger pages where no body container was found.
    pub has_post_body: bool,
    /// Absolute image URLs within the exported part, document order, unique.
    pub image_urls: Vec<Url>,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, tree: &ContentTree, platform: Platform, base: Option<&Url>)
        -> ExtractedContent;
}

/// Locates the first `div` carrying one of [`CONTAINER_CLASSES`].
///
/// - Blogger with a container: the container is exported.
/// - Blogger without one: the whole page is exported, `has_post_body` false.
/// - Other platforms: the whole page is exported.
#[derive(Debug)]
pub struct ContainerExtractor {
    selectors: Vec<Selector>,
}

impl ContainerExtractor {
    pub fn new() -> Self {
        let selectors = CONTAINER_CLASSES
            .iter()
            .filter_map(|class| Selector::parse(&format!("div.{class}")).ok())
            .collect();
        Self { selectors }
    }

    pub fn find_container<'a>(&self, tree: &'a ContentTree) -> Option<ElementRef<'a>> {
        let root = tree.root();
        self.selectors
            .iter()
            .find_map(|selector| root.select(selector).next())
    }
}

impl Default for ContainerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for ContainerExtractor {
    fn extract(
        &self,
        tree: &ContentTree,
        platform: Platform,
        base: Option<&Url>,
    ) -> ExtractedContent {
        match (platform, self.find_container(tree)) {
            (Platform::Blogger, Some(container)) => ExtractedContent {
                markup: container.html(),
                has_post_body: true,
                image_urls: collect_image_urls(container, base),
            },
            (platform, _) => ExtractedContent {
                markup: tree.markup(),
                has_post_body: platform != Platform::Blogger,
                image_urls: collect_image_urls(tree.root(), base),
            },
        }
    }
}
