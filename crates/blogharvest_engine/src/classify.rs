use blogharvest_core::{classify_markup, join_feed_path, Platform, BLOGGER_FEED_SUFFIX};
use engine_logging::{engine_debug, engine_info};

use crate::decode::decode_apparent;
use crate::EngineContext;

/// Probe the native Blogger feed of `base_url`.
///
/// Returns the feed URL when the probe answers 200 with an XML content type.
/// Network errors count as "not Blogger".
pub async fn probe_blogger_feed(ctx: &EngineContext, base_url: &str) -> Option<String> {
    let feed_url = join_feed_path(base_url, BLOGGER_FEED_SUFFIX);
    match ctx.client.head(&feed_url).await {
        Ok(response) if response.status == 200 && response.is_xml() => {
            engine_info!("Detected Blogspot site using custom domain: {}", feed_url);
            Some(feed_url)
        }
        Ok(response) => {
            engine_debug!(
                "Blogger probe {} answered {} ({:?})",
                feed_url,
                response.status,
                response.content_type
            );
            None
        }
        Err(err) => {
            engine_debug!("Blogger probe {} failed: {}", feed_url, err);
            None
        }
    }
}

/// Fetch the home page and classify it with the ordered marker rules.
/// A network failure is recorded and yields [`Platform::Unknown`].
pub async fn classify_site(ctx: &EngineContext, base_url: &str) -> Platform {
    match ctx.client.get(base_url).await {
        Ok(response) => {
            let decoded = decode_apparent(&response.bytes);
            classify_markup(base_url, &decoded.text)
        }
        Err(err) => {
            ctx.report(format!("Error detecting CMS: {err} for URL: {base_url}"));
            Platform::Unknown
        }
    }
}
