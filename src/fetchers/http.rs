use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};
use crate::fetchers::{Fetcher, RetryPolicy, parse_url};
use crate::parsers::{self, Page, ParserType};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

/// Plain HTTP GET fetcher
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| CrawlError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            policy: RetryPolicy::from_config(config),
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// One GET, accepted only on 200
    async fn attempt(&self, url: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CrawlError::transport(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CrawlError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let parser_type = ParserType::detect(content_type.as_deref(), url).ok_or_else(|| {
            CrawlError::parse(
                url,
                format!("unsupported content type {}", content_type.as_deref().unwrap_or("?")),
            )
        })?;

        let body = response
            .text()
            .await
            .map_err(|e| CrawlError::transport(url, e))?;

        Ok(parsers::parse(&body, url, parser_type))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        parse_url(url)?;
        ::log::debug!("GET {}", url);
        self.policy.run(url, || self.attempt(url)).await
    }
}
