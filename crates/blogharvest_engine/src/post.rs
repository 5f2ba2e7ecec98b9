use engine_logging::engine_info;

use crate::decode::decode_apparent;
use crate::tree::MarkupKind;
use crate::EngineContext;

/// Decoded body of a post, ready to be parsed into a [`crate::ContentTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPost {
    pub url: String,
    pub markup: String,
    pub kind: MarkupKind,
    pub encoding_label: String,
}

/// Fetch one post. Any failure is recorded and yields `None`: the caller
/// skips the entry.
pub async fn fetch_post(ctx: &EngineContext, url: &str) -> Option<FetchedPost> {
    engine_info!("Fetching post content from URL: {}", url);
    let response = match ctx.client.get(url).await {
        Ok(response) => response,
        Err(err) => {
            ctx.report(format!("Failed to retrieve post content: {err} for URL: {url}"));
            return None;
        }
    };
    if !response.is_success() {
        ctx.report(format!(
            "Failed to retrieve post content. Status code: {} for URL: {}",
            response.status, url
        ));
        return None;
    }

    let kind = if response.is_xml() {
        MarkupKind::Xml
    } else {
        MarkupKind::Html
    };
    let decoded = decode_apparent(&response.bytes);
    Some(FetchedPost {
        url: response.final_url,
        markup: decoded.text,
        kind,
        encoding_label: decoded.encoding_label,
    })
}
