//! Sentence-level filtering of page text against the keywords.

use crate::error::{CrawlError, Result};
use crate::nlp::{Embedder, SentenceSegmenter, cosine_similarity};

/// Keeps the sentences of a page that are semantically close to a keyword
pub struct ContentFilter<'a> {
    embedder: &'a dyn Embedder,
    segmenter: &'a dyn SentenceSegmenter,
    threshold: f32,
}

impl<'a> ContentFilter<'a> {
    pub fn new(
        embedder: &'a dyn Embedder,
        segmenter: &'a dyn SentenceSegmenter,
        threshold: f32,
    ) -> Self {
        Self {
            embedder,
            segmenter,
            threshold,
        }
    }

    /// Sentences of `text` whose best keyword similarity exceeds the
    /// threshold, in their original order.
    ///
    /// Each keyword and each sentence is embedded once.
    pub async fn filter_content<S: AsRef<str>>(
        &self,
        text: &str,
        keywords: &[S],
    ) -> Result<Vec<String>> {
        let sentences = self.segmenter.segment(text);
        if sentences.is_empty() || keywords.is_empty() {
            return Ok(Vec::new());
        }

        let keyword_refs = keywords.iter().map(AsRef::as_ref).collect::<Vec<_>>();
        let keyword_vectors = self.embed_all(&keyword_refs).await?;
        let sentence_refs = sentences.iter().map(String::as_str).collect::<Vec<_>>();
        let sentence_vectors = self.embed_all(&sentence_refs).await?;

        let kept = sentences
            .into_iter()
            .zip(sentence_vectors.iter())
            .filter(|(_, sentence_vector)| {
                let best = keyword_vectors
                    .iter()
                    .map(|k| cosine_similarity(sentence_vector, k).clamp(0.0, 1.0))
                    .fold(0.0f32, f32::max);
                best > self.threshold
            })
            .map(|(sentence, _)| sentence)
            .collect::<Vec<_>>();

        Ok(kept)
    }

    async fn embed_all(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let vectors = self.embedder.embed_batch(texts).await?;
        if vectors.len() != texts.len() {
            return Err(CrawlError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::testing::{HashedNgramEmbedder, TopicEmbedder};
    use crate::nlp::{Capabilities, SrxSegmenter};
    use async_trait::async_trait;

    // "pric" covers both "pricing" and "price"
    const TOPICS: &[&str] = &["pric", "hiking", "support"];

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(CrawlError::Embedding("model unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_keeps_matching_sentences_in_order() {
        let embedder = TopicEmbedder::new(TOPICS);
        let segmenter = SrxSegmenter::default();
        let filter = ContentFilter::new(&embedder, &segmenter, 0.8);
        let text = "Our pricing is simple. The team loves hiking. The price is billed monthly. We offer support.";

        let kept = filter.filter_content(text, &["pricing"]).await.unwrap();
        assert_eq!(kept, vec!["Our pricing is simple.", "The price is billed monthly."]);

        let kept = filter
            .filter_content(text, &["support", "pricing"])
            .await
            .unwrap();
        assert_eq!(
            kept,
            vec![
                "Our pricing is simple.",
                "The price is billed monthly.",
                "We offer support."
            ]
        );
    }

    #[tokio::test]
    async fn test_block_lines_are_judged_separately() {
        let embedder = TopicEmbedder::new(TOPICS);
        let segmenter = SrxSegmenter::default();
        let filter = ContentFilter::new(&embedder, &segmenter, 0.8);
        let text = "Home\nPricing\nStarter plan price is $10\nWe love hiking";

        let kept = filter.filter_content(text, &["pricing"]).await.unwrap();
        assert_eq!(kept, vec!["Pricing", "Starter plan price is $10"]);
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let embedder = TopicEmbedder::new(TOPICS);
        let segmenter = SrxSegmenter::default();
        // pricing + hiking sentence: cos with [1,0,0] = 1/sqrt(2) ~ 0.707
        let text = "Pricing for hiking trips.";

        let strict = ContentFilter::new(&embedder, &segmenter, 0.8);
        assert!(strict.filter_content(text, &["pricing"]).await.unwrap().is_empty());

        let loose = ContentFilter::new(&embedder, &segmenter, 0.7);
        assert_eq!(loose.filter_content(text, &["pricing"]).await.unwrap().len(), 1);

        // exactly at the threshold is dropped
        let exact = ContentFilter::new(&embedder, &segmenter, 1.0);
        assert!(exact.filter_content("Pricing.", &["pricing"]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_keywords_drops_everything() {
        let embedder = TopicEmbedder::new(TOPICS);
        let segmenter = SrxSegmenter::default();
        let filter = ContentFilter::new(&embedder, &segmenter, 0.8);
        let kept = filter
            .filter_content("Our pricing is simple.", &[] as &[&str])
            .await
            .unwrap();
        assert!(kept.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let segmenter = SrxSegmenter::default();
        let filter = ContentFilter::new(&FailingEmbedder, &segmenter, 0.8);
        assert!(matches!(
            filter.filter_content("Our pricing is simple.", &["pricing"]).await,
            Err(CrawlError::Embedding(_))
        ));
    }

    #[tokio::test]
    async fn test_lexical_embedder_matches_near_duplicates() {
        let embedder = HashedNgramEmbedder::default();
        let segmenter = SrxSegmenter::default();
        let filter = ContentFilter::new(&embedder, &segmenter, 0.8);
        let kept = filter
            .filter_content("Pricing. Something else entirely.", &["pricing"])
            .await
            .unwrap();
        assert_eq!(kept, vec!["Pricing."]);
    }

    #[tokio::test]
    #[ignore = "downloads the sentence embedding model"]
    async fn test_model_keeps_realistic_pricing_sentence() {
        let caps = Capabilities::load().await.unwrap();
        let filter = ContentFilter::new(caps.embedder.as_ref(), caps.segmenter.as_ref(), 0.8);

        let kept = filter
            .filter_content(
                "Our pricing starts at $10 per month.\nFollow us on social media",
                &["pricing"],
            )
            .await
            .unwrap();
        assert!(kept.contains(&"Our pricing starts at $10 per month.".to_string()));
    }
}
