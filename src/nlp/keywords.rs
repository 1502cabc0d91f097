use crate::error::{CrawlError, Result};
use crate::nlp::embedding::{Embedder, cosine_similarity};
use crate::nlp::stopwords::is_stopword;
use crate::nlp::tokenize;
use async_trait::async_trait;
use std::sync::Arc;

/// A keyword phrase and the extractor's relevance weight for it
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub phrase: String,
    pub weight: f32,
}

impl Keyword {
    pub fn new(phrase: impl Into<String>, weight: f32) -> Self {
        Self {
            phrase: phrase.into(),
            weight,
        }
    }
}

/// Maps free text to a ranked list of keyword phrases
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// At most `top_n` keywords, most relevant first
    async fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<Keyword>>;
}

/// Ranks candidate n-grams by how close their embedding is to the embedding
/// of the whole text.
///
/// Candidates are the text's words with stopwords removed, joined into
/// n-grams of length 1 to `max_ngram`, deduplicated.
pub struct EmbeddingKeywordExtractor {
    embedder: Arc<dyn Embedder>,
    max_ngram: usize,
}

impl EmbeddingKeywordExtractor {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            max_ngram: 1,
        }
    }

    pub fn with_max_ngram(mut self, max_ngram: usize) -> Self {
        self.max_ngram = max_ngram.max(1);
        self
    }

    /// Candidate phrases in first-occurrence order
    fn candidates(&self, text: &str) -> Vec<String> {
        let words = tokenize(text)
            .into_iter()
            .filter(|w| !is_stopword(w))
            .collect::<Vec<_>>();

        let mut seen = std::collections::HashSet::new();
        let mut candidates = Vec::new();
        for n in 1..=self.max_ngram {
            for window in words.windows(n) {
                let phrase = window.join(" ");
                if seen.insert(phrase.clone()) {
                    candidates.push(phrase);
                }
            }
        }
        candidates
    }
}

#[async_trait]
impl KeywordExtractor for EmbeddingKeywordExtractor {
    async fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<Keyword>> {
        let candidates = self.candidates(text);
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let document = self.embedder.embed(text).await?;
        let phrases = candidates.iter().map(String::as_str).collect::<Vec<_>>();
        let vectors = self.embedder.embed_batch(&phrases).await?;
        if vectors.len() != candidates.len() {
            return Err(CrawlError::Embedding(format!(
                "expected {} embeddings, got {}",
                candidates.len(),
                vectors.len()
            )));
        }

        let mut keywords = candidates
            .into_iter()
            .zip(vectors.iter())
            .map(|(phrase, vector)| Keyword::new(phrase, cosine_similarity(&document, vector)))
            .collect::<Vec<_>>();

        // stable: equal weights keep first-occurrence order
        keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        keywords.truncate(top_n);
        Ok(keywords)
    }
}
