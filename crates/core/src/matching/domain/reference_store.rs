use std::sync::{Arc, PoisonError, RwLock};

use crate::detection::domain::embedding::Embedding;

/// Holds at most one reference embedding, shared between the upload path
/// and every running stream.
///
/// `set` swaps the whole value, so readers see either the old or the new
/// reference and never a partial one.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    reference: RwLock<Option<Arc<Embedding>>>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, embedding: Embedding) {
        let mut guard = self
            .reference
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(embedding));
    }

    pub fn get(&self) -> Option<Arc<Embedding>> {
        self.reference
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
