use blogharvest_core::{feed_candidates, join_feed_path, Platform};
use engine_logging::{engine_debug, engine_info};

use crate::classify::{classify_site, probe_blogger_feed};
use crate::EngineContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFeed {
    pub url: String,
    pub platform: Platform,
}

impl ResolvedFeed {
    /// Whether the feed understands offset pagination.
    pub fn paginated(&self) -> bool {
        self.platform.supports_offset_pagination()
    }
}

/// Turn a site URL into a feed endpoint.
///
/// The Blogger probe short-circuits everything else. Otherwise the site is
/// classified and the platform's candidate paths are probed in order. When
/// nothing answers, the input URL is used as the feed as-is.
pub async fn resolve_feed(ctx: &EngineContext, base_url: &str) -> ResolvedFeed {
    if let Some(url) = probe_blogger_feed(ctx, base_url).await {
        return ResolvedFeed {
            url,
            platform: Platform::Blogger,
        };
    }

    let platform = classify_site(ctx, base_url).await;
    engine_info!("Detected CMS: {}", platform);

    for suffix in feed_candidates(platform) {
        let candidate = join_feed_path(base_url, suffix);
        match ctx.client.head(&candidate).await {
            Ok(response) if response.status == 200 => {
                engine_info!("Found RSS feed at: {}", candidate);
                return ResolvedFeed {
                    url: candidate,
                    platform,
                };
            }
            Ok(response) => {
                engine_debug!("Feed candidate {} answered {}", candidate, response.status)
            }
            Err(err) => engine_debug!("Feed candidate {} failed: {}", candidate, err),
        }
    }

    engine_info!("No feed endpoint found, using {} directly", base_url);
    ResolvedFeed {
        url: base_url.to_string(),
        platform,
    }
}
