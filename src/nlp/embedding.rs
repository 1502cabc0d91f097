use crate::error::Result;
use async_trait::async_trait;

/// Turns text into a dense vector for semantic comparison.
///
/// Implementations wrap whatever model is available; the pipeline only relies
/// on cosine similarity between outputs of the same embedder.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds several texts, in order. Override when the model batches.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

/// Cosine similarity of two vectors, 0 when either is all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum::<f32>();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Embedding-based similarity of two texts, clamped to [0, 1].
///
/// Not to be confused with [`crate::nlp::TfVectorizer::similarity`], the
/// lexical measure used when scoring links.
pub async fn semantic_similarity(
    embedder: &dyn Embedder,
    text_a: &str,
    text_b: &str,
) -> Result<f32> {
    let a = embedder.embed(text_a).await?;
    let b = embedder.embed(text_b).await?;
    Ok(cosine_similarity(&a, &b).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::testing::HashedNgramEmbedder;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_identical_text_is_fully_similar() {
        let embedder = HashedNgramEmbedder::default();
        let score = semantic_similarity(&embedder, "Pricing plans", "pricing   PLANS")
            .await
            .unwrap();
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_similarity_is_clamped() {
        struct Opposite;

        #[async_trait]
        impl Embedder for Opposite {
            async fn embed(&self, text: &str) -> Result<Vec<f32>> {
                Ok(vec![if text.starts_with('-') { -1.0 } else { 1.0 }])
            }
        }

        let score = semantic_similarity(&Opposite, "-a", "b").await.unwrap();
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let embedder = HashedNgramEmbedder::default();
        let batch = embedder.embed_batch(&["a cat", "a dog"]).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], embedder.embed("a dog").await.unwrap());
    }
}
