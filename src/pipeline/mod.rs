//! One crawl run, start to finish.
//!
//! validate → fetch root → extract keywords → select links → for each link
//! (fetch → filter → normalize → segment) → assemble → persist.
//!
//! Only the root page's links are ever followed; pages reached from those
//! links are never scanned for further links.

use crate::config::CrawlConfig;
use crate::content::ContentFilter;
use crate::error::{CrawlError, Result};
use crate::fetchers::Fetcher;
use crate::filter::UrlFilter;
use crate::links::LinkScorer;
use crate::nlp::Capabilities;
use crate::parsers::text::clean_text;
use crate::results::{Document, RunResult};
use crate::store::ResultStore;
use futures::stream::{self, StreamExt};
use std::sync::Arc;


/// Runs guided crawls with a fixed set of collaborators
pub struct Pipeline {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    capabilities: Capabilities,
    store: Arc<dyn ResultStore>,
}

impl Pipeline {
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        capabilities: Capabilities,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            config,
            fetcher,
            capabilities,
            store,
        }
    }

    /// Crawls `url` for content relevant to `instructions`.
    ///
    /// Every failure collapses to `None`; the reason is only logged. An
    /// empty but present result means the run worked and found nothing.
    pub async fn run(&self, url: &str, instructions: &str) -> Option<RunResult> {
        match self.try_run(url, instructions).await {
            Ok(result) => Some(result),
            Err(e) => {
                ::log::error!("Error scraping {}: {}", url, e);
                None
            }
        }
    }

    /// Like [`Pipeline::run`], returning the document in its JSON form
    pub async fn run_to_json(&self, url: &str, instructions: &str) -> Option<String> {
        let result = self.run(url, instructions).await?;
        match result.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                ::log::error!("Failed to serialize results for {}: {}", url, e);
                None
            }
        }
    }

    /// Like [`Pipeline::run`], but says why a run produced nothing
    pub async fn try_run(&self, url: &str, instructions: &str) -> Result<RunResult> {
        if instructions.trim().is_empty() {
            return Err(CrawlError::Validation("instructions are empty".into()));
        }

        let filter = UrlFilter::new(url, &self.config.exclude_patterns)?;

        ::log::info!("Scraping {}...", url);
        let timestamp = RunResult::now_timestamp();
        let root = self.fetcher.fetch(url).await?;

        let keywords = self.extract_keywords(instructions).await?;
        ::log::info!("Extracted keywords: {:?}", keywords);

        let scorer = LinkScorer::new(
            self.fetcher.as_ref(),
            &filter,
            self.config.link_limit,
            self.config.link_similarity_threshold,
        );
        let candidates = scorer.select_links(&root, &keywords, url).await;
        ::log::info!(
            "Extracted links: {:?}",
            candidates.iter().map(|c| &c.url).collect::<Vec<_>>()
        );

        let links = candidates
            .into_iter()
            .map(|c| c.url)
            .filter(|link| filter.is_within_seed(link))
            .collect::<Vec<_>>();
        ::log::info!("Filtering content on {} pages...", links.len());

        let documents = stream::iter(links)
            .map(|link| self.process_link(link, &keywords))
            .buffered(self.config.link_concurrency.max(1))
            .filter_map(|doc| async move { doc })
            .collect::<Vec<_>>()
            .await;

        let result = RunResult::new(timestamp, documents);
        self.persist(&result)?;

        ::log::info!("Run produced {} documents", result.results.len());
        Ok(result)
    }

    /// Keyword phrases for the run, weights dropped, at most `max_keywords`
    async fn extract_keywords(&self, instructions: &str) -> Result<Vec<String>> {
        let mut keywords = self
            .capabilities
            .keywords
            .extract_keywords(instructions, self.config.max_keywords)
            .await?;
        keywords.truncate(self.config.max_keywords);

        let phrases = keywords
            .into_iter()
            .map(|k| k.phrase)
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>();
        if phrases.is_empty() {
            return Err(CrawlError::Keywords(format!(
                "no keywords found in {instructions:?}"
            )));
        }
        Ok(phrases)
    }

    /// Fetch, filter, normalize and re-segment one selected link.
    ///
    /// Failures here only cost this link its document.
    async fn process_link(&self, link: String, keywords: &[String]) -> Option<Document> {
        let page = match self.fetcher.fetch(&link).await {
            Ok(page) => page,
            Err(e) => {
                ::log::warn!("Skipping {}: {}", link, e);
                return None;
            }
        };

        ::log::info!("Filtering content on {}...", link);
        let filter = ContentFilter::new(
            self.capabilities.embedder.as_ref(),
            self.capabilities.segmenter.as_ref(),
            self.config.sentence_similarity_threshold,
        );
        let matched = match filter.filter_content(&page.text, keywords).await {
            Ok(matched) => matched,
            Err(e) => {
                ::log::warn!("Skipping {}: {}", link, e);
                return None;
            }
        };

        let cleaned = clean_text(&matched.join(" "));
        let sentences = self.capabilities.segmenter.segment(&cleaned);
        ::log::debug!("{} sentences kept from {}", sentences.len(), link);

        Some(Document::new(link, sentences))
    }

    fn persist(&self, result: &RunResult) -> Result<()> {
        match self.store.save(result) {
            Ok(()) => Ok(()),
            Err(e) if self.config.strict_persist => Err(e),
            Err(e) => {
                ::log::warn!("Results not persisted: {}", e);
                Ok(())
            }
        }
    }

    /// Releases fetcher resources
    pub async fn shutdown(&self) {
        self.fetcher.shutdown().await;
    }
}
