use crate::detection::domain::embedding::Embedding;

/// Domain interface for deciding whether two embeddings belong to the same person.
pub trait FaceMatcher: Send + Sync {
    fn is_match(&self, reference: &Embedding, candidate: &Embedding) -> bool;
}
