//! Fetching through a WebDriver-controlled browser, for pages that only
//! render their content after running scripts.

use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};
use crate::fetchers::{Fetcher, RetryPolicy, parse_url};
use crate::parsers::{self, Page, ParserType};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tokio::sync::Mutex;

/// Endpoints tried when the configured WebDriver isn't reachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Renders pages in a headless browser and parses the resulting source
pub struct BrowserFetcher {
    webdriver_url: String,
    policy: RetryPolicy,
    // Connected lazily on the first fetch
    client: Mutex<Option<Client>>,
}

impl BrowserFetcher {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            policy: RetryPolicy::from_config(config),
            client: Mutex::new(None),
        }
    }

    pub fn webdriver_url(&self) -> &str {
        &self.webdriver_url
    }

    /// Returns the shared session, connecting if there isn't one
    async fn session(&self) -> Result<Client> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = connect_to_webdriver(&self.webdriver_url).await?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Drops a session that stopped answering so the next attempt reconnects
    async fn discard_session(&self) {
        if let Some(client) = self.client.lock().await.take() {
            ::log::warn!("Discarding WebDriver session");
            if let Err(e) = client.close().await {
                ::log::debug!("Failed to close stale WebDriver session: {}", e);
            }
        }
    }

    /// Navigate, read the source, parse
    async fn attempt(&self, url: &str) -> Result<Page> {
        let client = self.session().await?;

        let source = match navigate(&client, url).await {
            Ok(source) => source,
            Err(e) => {
                if e.to_string().contains("Unable to find session")
                    || e.to_string().contains("invalid session id")
                {
                    self.discard_session().await;
                }
                return Err(CrawlError::transport(url, e));
            }
        };

        Ok(parsers::parse(&source, url, ParserType::from_url(url)))
    }
}

async fn navigate(client: &Client, url: &str) -> std::result::Result<String, fantoccini::error::CmdError> {
    client.goto(url).await?;
    client.source().await
}

/// WebDriver capabilities for a headless Chrome or Firefox
fn headless_capabilities() -> serde_json::Map<String, serde_json::Value> {
    let caps = json!({
        "goog:chromeOptions": { "args": ["--headless", "--disable-gpu", "--no-sandbox"] },
        "moz:firefoxOptions": { "args": ["-headless"] }
    });
    match caps {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

/// Connects to the WebDriver instance, trying the common local ports after the configured one
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(headless_capabilities());

    match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(CrawlError::transport(
        webdriver_url,
        "failed to connect to any WebDriver server",
    ))
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        parse_url(url)?;
        ::log::debug!("RENDER: {}", url);
        self.policy.run(url, || self.attempt(url)).await
    }

    async fn shutdown(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }
}
