use crate::error::{CrawlError, Result};
use regex::Regex;
use url::Url;

/// Decides which discovered links a run may follow
#[derive(Debug, Clone)]
pub struct UrlFilter {
    /// Seed URL exactly as the caller passed it
    seed: String,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter for `seed`, compiling the exclude patterns
    pub fn new(seed: impl Into<String>, exclude_patterns: &[String]) -> Result<Self> {
        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(
                Regex::new(pattern)
                    .map_err(|e| CrawlError::Config(format!("bad exclude pattern {pattern:?}: {e}")))?,
            );
        }

        Ok(Self {
            seed: seed.into(),
            exclude_regexes,
        })
    }

    /// Same-site containment: a plain string prefix match against the seed
    pub fn is_within_seed(&self, url: &str) -> bool {
        url.starts_with(&self.seed)
    }

    /// Whether any exclude pattern matches the URL
    pub fn is_excluded(&self, url: &Url) -> bool {
        let url_str = url.as_str();
        self.exclude_regexes.iter().any(|regex| regex.is_match(url_str))
    }
}

/// Resolves an href against the page it was found on
pub fn resolve(base_url: &str, href: &str) -> Option<Url> {
    Url::parse(base_url).and_then(|base| base.join(href)).ok()
}
