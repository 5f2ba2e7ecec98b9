#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use blogharvest_engine::{EngineContext, FetchSettings, ReqwestClient, RetryPolicy};
use engine_logging::RecordingSink;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Context over a real client without retries, plus the sink it reports to.
pub fn context() -> (EngineContext, Arc<RecordingSink>) {
    context_with(FetchSettings {
        retry: RetryPolicy::none(),
        ..FetchSettings::default()
    })
}

pub fn context_with(settings: FetchSettings) -> (EngineContext, Arc<RecordingSink>) {
    init_logging();
    let sink = Arc::new(RecordingSink::new());
    let client = ReqwestClient::new(settings).unwrap();
    (EngineContext::new(Arc::new(client), sink.clone()), sink)
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        backoff_factor: Duration::from_millis(5),
        ..RetryPolicy::default()
    }
}

pub fn rss(items: &[(&str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, link)| {
            format!(
                "<item><title>{title}</title><link>{link}</link>\
                 <pubDate>Mon, 01 Jan 2024 10:00:00 +0000</pubDate></item>"
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>Blog</title>\
         <link>http://blog.test/</link><description>d</description>{items}</channel></rss>"
    )
}

pub fn blogger_post(body: &str) -> String {
    format!(
        "<html><head><title>t</title></head><body><div class=\"header\">nav</div>\
         <div class=\"post-body\">{body}</div></body></html>"
    )
}
