//! Page fetching: the only place that touches the network or sleeps.

pub mod browser;
pub mod http;

use crate::config::{CrawlConfig, FetchMode};
use crate::error::{CrawlError, Result};
use crate::parsers::Page;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

/// Fetches a URL and parses it into a [`Page`].
///
/// Implementations retry internally; an `Err` means the page is absent for
/// the rest of the run.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;

    /// Release any held resources (browser sessions)
    async fn shutdown(&self) {}
}

/// Bounded retry with a fixed per-attempt timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(10),
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            timeout: config.request_timeout(),
            backoff: config.retry_backoff(),
        }
    }

    /// Runs `attempt` until it yields a page or the attempts run out.
    ///
    /// Transport failures (including the per-attempt timeout) sleep for the
    /// backoff before the next try. Non-200 responses are retried right away.
    /// Any other error ends the loop immediately.
    pub async fn run<F, Fut>(&self, url: &str, mut attempt: F) -> Result<Page>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Page>>,
    {
        let mut last_error = None;

        for n in 1..=self.max_attempts {
            let outcome = match tokio::time::timeout(self.timeout, attempt()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(CrawlError::transport(
                    url,
                    format!("timed out after {:?}", self.timeout),
                )),
            };

            let e = match outcome {
                Ok(page) => {
                    ::log::debug!("Fetched {} on attempt {}", url, n);
                    return Ok(page);
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            ::log::debug!("Attempt {}/{} for {} failed: {}", n, self.max_attempts, url, e);
            let backoff = matches!(e, CrawlError::Transport { .. });
            last_error = Some(e);
            if backoff && n < self.max_attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| CrawlError::transport(url, "no attempts were made")))
    }
}

/// Builds the fetcher selected by `config.fetch_mode`
pub fn from_config(config: &CrawlConfig) -> Result<Arc<dyn Fetcher>> {
    let fetcher: Arc<dyn Fetcher> = match config.fetch_mode {
        FetchMode::Http => Arc::new(HttpFetcher::new(config)?),
        FetchMode::Browser => Arc::new(BrowserFetcher::new(config)),
    };
    Ok(fetcher)
}

/// Rejects strings that aren't absolute URLs before any attempt is made
pub(crate) fn parse_url(url: &str) -> Result<url::Url> {
    url::Url::parse(url).map_err(|e| CrawlError::Validation(format!("invalid URL {url:?}: {e}")))
}
