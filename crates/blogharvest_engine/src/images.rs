use std::collections::HashSet;
use std::path::{Path, PathBuf};

use blogharvest_core::{is_supported_image, sanitize_url_filename};
use engine_logging::{engine_debug, engine_info};
use scraper::{ElementRef, Selector};
use url::Url;

use crate::persist::AtomicFileWriter;
use crate::EngineContext;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageDownloadReport {
    pub saved: Vec<PathBuf>,
    /// Not attempted: unsupported extension or no usable file name.
    pub skipped: usize,
    pub failed: usize,
}

/// Absolute URLs of every `<img src>` below `scope`, resolved against `base`.
pub fn collect_image_urls(scope: ElementRef<'_>, base: Option<&Url>) -> Vec<Url> {
    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    scope
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(|src| resolve_url(src, base))
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}

/// Download the supported images among `urls` into `folder`, one file per
/// image named after the URL's last path segment. Failures are recorded and
/// never abort the post.
pub async fn download_images(
    ctx: &EngineContext,
    urls: &[Url],
    folder: &Path,
) -> ImageDownloadReport {
    let writer = AtomicFileWriter::new(folder.to_path_buf());
    let mut report = ImageDownloadReport::default();

    for url in urls {
        if !is_supported_image(url) {
            engine_debug!("Skipping unsupported image {}", url);
            report.skipped += 1;
            continue;
        }
        let Some(file_name) = sanitize_url_filename(url) else {
            report.skipped += 1;
            continue;
        };

        let response = match ctx.client.get(url.as_str()).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                ctx.report(format!(
                    "Error downloading image: HTTP {} for URL: {}",
                    response.status, url
                ));
                report.failed += 1;
                continue;
            }
            Err(err) => {
                ctx.report(format!("Error downloading image: {err} for URL: {url}"));
                report.failed += 1;
                continue;
            }
        };

        match writer.write_bytes(&file_name, &response.bytes) {
            Ok(path) => {
                engine_info!("Image downloaded: {}", path.display());
                report.saved.push(path);
            }
            Err(err) => {
                ctx.report(format!("Error saving image: {err} for URL: {url}"));
                report.failed += 1;
            }
        }
    }
    report
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("data:") || lower.starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}
