use std::time::Duration;

use engine_logging::engine_debug;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use crate::retry::RetryPolicy;
use crate::{FailureKind, FetchError, HttpResponse};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 25 * 1024 * 1024,
            user_agent: concat!("blogharvest/", env!("CARGO_PKG_VERSION")).to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP access shared by every component of a run.
///
/// Responses with any status are returned as `Ok`; only transport problems
/// become errors, so callers decide what a non-success status means.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;

    /// Lightweight probe; the body is not read.
    async fn head(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    async fn execute(&self, method: Method, url: &str) -> Result<HttpResponse, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let policy = &self.settings.retry;

        let mut retry = 0;
        loop {
            let outcome = self.send_once(method.clone(), parsed.clone()).await;
            let retryable = match &outcome {
                Ok(response) => policy.retries_status(response.status),
                Err(err) => err.kind.is_retryable(),
            };
            if !retryable || retry >= policy.max_retries {
                return outcome;
            }

            retry += 1;
            let delay = policy.delay_for(retry);
            engine_debug!(
                "{} {} failed ({}), retry {}/{} in {:?}",
                method,
                url,
                describe(&outcome),
                retry,
                policy.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: reqwest::Url,
    ) -> Result<HttpResponse, FetchError> {
        let read_body = method != Method::HEAD;
        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if !read_body {
            return Ok(HttpResponse {
                status,
                final_url,
                content_type,
                bytes: Vec::new(),
            });
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(HttpResponse {
            status,
            final_url,
            content_type,
            bytes,
        })
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.execute(Method::GET, url).await
    }

    async fn head(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.execute(Method::HEAD, url).await
    }
}

fn describe(outcome: &Result<HttpResponse, FetchError>) -> String {
    match outcome {
        Ok(response) => format!("status {}", response.status),
        Err(err) => err.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
