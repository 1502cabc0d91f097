use crate::nlp::tokenize;
use std::collections::HashMap;

/// Term-frequency vector space over a fixed vocabulary.
///
/// Fitted on the keyword phrases; tokens outside that vocabulary are ignored
/// when transforming page text.
#[derive(Debug, Clone, Default)]
pub struct TfVectorizer {
    vocabulary: HashMap<String, usize>,
}

impl TfVectorizer {
    /// Builds the vocabulary from every token of every document in `corpus`
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut vocabulary = HashMap::new();
        for document in corpus {
            for token in tokenize(document.as_ref()) {
                let next = vocabulary.len();
                vocabulary.entry(token).or_insert(next);
            }
        }
        Self { vocabulary }
    }

    /// Counts of each vocabulary term in `text`
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut counts = vec![0.0f32; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                counts[index] += 1.0;
            }
        }
        counts
    }

    /// Cosine of the TF vectors of two texts, in [0, 1]
    pub fn similarity(&self, text_a: &str, text_b: &str) -> f32 {
        let a = self.transform(text_a);
        let b = self.transform(text_b);
        crate::nlp::cosine_similarity(&a, &b).clamp(0.0, 1.0)
    }
}
