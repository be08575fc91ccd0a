use crate::detection::domain::embedding::Embedding;
use crate::matching::domain::face_matcher::FaceMatcher;

/// Cosine similarity threshold tuned for ArcFace embeddings.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Matches when the cosine similarity of two embeddings reaches the threshold.
#[derive(Clone, Copy, Debug)]
pub struct CosineMatcher {
    threshold: f64,
}

impl CosineMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for CosineMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FaceMatcher for CosineMatcher {
    fn is_match(&self, reference: &Embedding, candidate: &Embedding) -> bool {
        reference.cosine_similarity(candidate) >= self.threshold
    }
}
