use crate::error::{CrawlError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How pages are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP GET
    #[default]
    Http,
    /// Render through a WebDriver-controlled browser
    Browser,
}

/// Configuration for a guided crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts per URL before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Sleep between attempts after a transport failure, in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// User-Agent header sent by the HTTP fetcher
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Keyword phrases kept from the instructions
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Candidate links fetched for scoring
    #[serde(default = "default_link_limit")]
    pub link_limit: usize,

    /// Minimum TF cosine between a candidate page and the keywords
    #[serde(default = "default_link_similarity_threshold")]
    pub link_similarity_threshold: f32,

    /// A sentence is kept when its best keyword similarity is above this
    #[serde(default = "default_sentence_similarity_threshold")]
    pub sentence_similarity_threshold: f32,

    /// Selected links processed at once
    #[serde(default = "default_link_concurrency")]
    pub link_concurrency: usize,

    /// Where the JSON result is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Fail the run when the result can't be written
    #[serde(default)]
    pub strict_persist: bool,

    /// Fetch strategy
    #[serde(default)]
    pub fetch_mode: FetchMode,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Regex patterns for links to drop before scoring
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    concat!("guided-crawl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_keywords() -> usize {
    10
}

fn default_link_limit() -> usize {
    5
}

fn default_link_similarity_threshold() -> f32 {
    0.3
}

fn default_sentence_similarity_threshold() -> f32 {
    0.8
}

fn default_link_concurrency() -> usize {
    1
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.json")
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            user_agent: default_user_agent(),
            max_keywords: default_max_keywords(),
            link_limit: default_link_limit(),
            link_similarity_threshold: default_link_similarity_threshold(),
            sentence_similarity_threshold: default_sentence_similarity_threshold(),
            link_concurrency: default_link_concurrency(),
            output_path: default_output_path(),
            strict_persist: false,
            fetch_mode: FetchMode::default(),
            webdriver_url: default_webdriver_url(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl CrawlConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            CrawlError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CrawlError::Config(format!("cannot read {}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CrawlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    /// Reject values no run could work with
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(CrawlError::Config("max_retries must be at least 1".into()));
        }
        if self.link_concurrency == 0 {
            return Err(CrawlError::Config(
                "link_concurrency must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("link_similarity_threshold", self.link_similarity_threshold),
            (
                "sentence_similarity_threshold",
                self.sentence_similarity_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CrawlError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
