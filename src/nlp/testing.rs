//! Deterministic embedders for unit tests.

use crate::error::Result;
use crate::nlp::{Embedder, tokenize};
use async_trait::async_trait;

/// Feature-hashed word and character-trigram counts, L2-normalized.
///
/// Texts sharing words end up close; there is no notion of meaning.
#[derive(Debug, Clone, Copy)]
pub struct HashedNgramEmbedder {
    dimensions: usize,
}

impl Default for HashedNgramEmbedder {
    fn default() -> Self {
        Self { dimensions: 1024 }
    }
}

impl HashedNgramEmbedder {
    fn bucket(&self, feature: &str) -> usize {
        (fnv1a(feature.as_bytes()) % self.dimensions as u64) as usize
    }
}

#[async_trait]
impl Embedder for HashedNgramEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];

        for word in tokenize(text) {
            vector[self.bucket(&word)] += 1.0;

            let padded = format!("#{word}#").chars().collect::<Vec<_>>();
            for window in padded.windows(3) {
                let trigram = window.iter().collect::<String>();
                vector[self.bucket(&trigram)] += 0.5;
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(vector)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x100000001b3)
    })
}

/// One dimension per topic; a text lights up every topic it mentions
pub struct TopicEmbedder {
    topics: &'static [&'static str],
}

impl TopicEmbedder {
    pub fn new(topics: &'static [&'static str]) -> Self {
        Self { topics }
    }
}

#[async_trait]
impl Embedder for TopicEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let text = text.to_lowercase();
        Ok(self
            .topics
            .iter()
            .map(|topic| if text.contains(topic) { 1.0 } else { 0.0 })
            .collect())
    }
}
