pub mod config;
pub mod content;
pub mod error;
pub mod fetchers;
pub mod filter;
pub mod links;
pub mod nlp;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{CrawlConfig, FetchMode};
pub use error::{CrawlError, Result};
pub use pipeline::Pipeline;
pub use results::{Document, RunResult};

use fetchers::Fetcher;
use nlp::Capabilities;
use std::sync::Arc;
use store::{JsonFileStore, ResultStore};

/// Builder for a single guided crawl
pub struct Crawl {
    url: String,
    instructions: String,
    config: CrawlConfig,
    capabilities: Option<Capabilities>,
    fetcher: Option<Arc<dyn Fetcher>>,
    store: Option<Arc<dyn ResultStore>>,
}

impl Crawl {
    /// Create a new builder for `url`, guided by `instructions`
    pub fn new(url: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            instructions: instructions.into(),
            config: CrawlConfig::default().with_env_overrides(),
            capabilities: None,
            fetcher: None,
            store: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = CrawlConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, config_str: &str) -> Result<Self> {
        let config = CrawlConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set how many candidate links are fetched and scored
    pub fn with_link_limit(mut self, link_limit: usize) -> Self {
        self.config.link_limit = link_limit;
        self
    }

    /// Use these language capabilities instead of loading the default model
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Use this fetcher instead of the one `fetch_mode` selects
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Use this store instead of a JSON file at `output_path`
    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Assemble the pipeline, loading the default capabilities if none were given
    pub async fn build(self) -> Result<(Pipeline, String, String)> {
        let config = self.config;
        config.validate()?;

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => fetchers::from_config(&config)?,
        };
        let store: Arc<dyn ResultStore> = match self.store {
            Some(store) => store,
            None => Arc::new(JsonFileStore::new(config.output_path.clone())),
        };
        let capabilities = match self.capabilities {
            Some(capabilities) => capabilities,
            None => Capabilities::load().await?,
        };

        Ok((
            Pipeline::new(config, fetcher, capabilities, store),
            self.url,
            self.instructions,
        ))
    }

    /// Run the crawl; `None` when there is no result
    pub async fn run(self) -> Option<RunResult> {
        let (pipeline, url, instructions) = match self.build().await {
            Ok(parts) => parts,
            Err(e) => {
                ::log::error!("Failed to start crawl: {}", e);
                return None;
            }
        };

        let result = pipeline.run(&url, &instructions).await;
        pipeline.shutdown().await;
        result
    }
}
