//! Language capabilities the pipeline calls through narrow traits.
//!
//! The entry point builds one [`Capabilities`] and hands it to the pipeline;
//! tests swap in deterministic stubs.

pub mod bert;
pub mod embedding;
pub mod keywords;
pub mod segment;
pub mod stopwords;
pub mod tf;

#[cfg(test)]
pub(crate) mod testing;

pub use bert::BertEmbedder;
pub use embedding::{Embedder, cosine_similarity, semantic_similarity};
pub use keywords::{EmbeddingKeywordExtractor, Keyword, KeywordExtractor};
pub use segment::{SentenceSegmenter, SrxSegmenter};
pub use tf::TfVectorizer;

use crate::error::Result;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("static regex"));

/// Lowercased word tokens of two or more characters
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// The injected language capabilities for one process
#[derive(Clone)]
pub struct Capabilities {
    pub keywords: Arc<dyn KeywordExtractor>,
    pub embedder: Arc<dyn Embedder>,
    pub segmenter: Arc<dyn SentenceSegmenter>,
}

impl Capabilities {
    pub fn new(
        keywords: Arc<dyn KeywordExtractor>,
        embedder: Arc<dyn Embedder>,
        segmenter: Arc<dyn SentenceSegmenter>,
    ) -> Self {
        Self {
            keywords,
            embedder,
            segmenter,
        }
    }

    /// Keywords ranked by a BERT sentence embedder, which also scores
    /// sentences, and SRX rule-based sentence splitting.
    ///
    /// Downloads the embedding model on first use.
    pub async fn load() -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(BertEmbedder::new().await?);
        Ok(Self::with_embedder(embedder))
    }

    /// The default keyword extractor and segmenter around `embedder`
    pub fn with_embedder(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            keywords: Arc::new(EmbeddingKeywordExtractor::new(embedder.clone())),
            embedder,
            segmenter: Arc::new(SrxSegmenter::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::testing::HashedNgramEmbedder;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Find PRICING info, a $10 plan!"),
            vec!["find", "pricing", "info", "10", "plan"]
        );
        assert!(tokenize("a b c").is_empty());
    }

    #[tokio::test]
    async fn test_capabilities_work_together() {
        let caps = Capabilities::with_embedder(Arc::new(HashedNgramEmbedder::default()));
        let keywords = caps
            .keywords
            .extract_keywords("pricing tiers", 10)
            .await
            .unwrap();
        assert_eq!(keywords.len(), 2);
        let sentences = caps.segmenter.segment("One. Two.");
        assert_eq!(sentences.len(), 2);
    }
}
