//! Sentence embeddings from a local BERT model.

use crate::error::{CrawlError, Result};
use crate::nlp::Embedder;
use async_trait::async_trait;
use rbert::{Bert, BertSource, EmbedderExt};

/// [`Embedder`] backed by an `rbert` sentence transformer.
///
/// Embeddings are the CLS token of the last hidden layer. The default source
/// is all-MiniLM-L6-v2, downloaded and cached on first use.
pub struct BertEmbedder {
    model: Bert,
}

impl BertEmbedder {
    /// Loads the default all-MiniLM-L6-v2 model
    pub async fn new() -> Result<Self> {
        Self::with_source(BertSource::mini_lm_l6_v2()).await
    }

    /// Loads the model described by `source`
    pub async fn with_source(source: BertSource) -> Result<Self> {
        ::log::info!("Loading sentence embedding model...");
        let model = Bert::builder()
            .with_source(source)
            .build()
            .await
            .map_err(|e| CrawlError::Embedding(format!("failed to load model: {e}")))?;
        Ok(Self { model })
    }
}

#[async_trait]
impl Embedder for BertEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self
            .model
            .embed(text)
            .await
            .map_err(|e| CrawlError::Embedding(e.to_string()))?;
        Ok(embedding.vector().to_vec())
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = self
            .model
            .embed_batch(texts.iter().copied())
            .await
            .map_err(|e| CrawlError::Embedding(e.to_string()))?;
        Ok(embeddings
            .iter()
            .map(|embedding| embedding.vector().to_vec())
            .collect())
    }
}
