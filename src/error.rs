//! Error types shared by every stage of a crawl run.
//!
//! Stages return [`CrawlError`] through [`Result`]; the pipeline decides per
//! stage whether an error skips one link or aborts the whole run.

use std::path::PathBuf;

/// Everything that can go wrong while producing a [`crate::RunResult`].
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Connection failure, timeout, or WebDriver session error.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered, but not with 200.
    #[error("unexpected HTTP status {status} for {url}")]
    Http { url: String, status: u16 },

    /// The body could not be turned into a page.
    #[error("parse error for {url}: {message}")]
    Parse { url: String, message: String },

    /// Caller input rejected before any work was done.
    #[error("validation error: {0}")]
    Validation(String),

    /// Keyword extraction failed or produced nothing usable.
    #[error("keyword extraction error: {0}")]
    Keywords(String),

    /// The embedding capability failed.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Writing the run result to its store failed.
    #[error("failed to persist results to {path:?}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Result could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Bad configuration (file, regex, WebDriver URL).
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CrawlError>;

impl CrawlError {
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Whether another attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Http { .. })
    }
}
