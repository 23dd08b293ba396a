use std::sync::Arc;

use crate::errors::StoreError;
use crate::models::{Document, SimilarityPair};

/// External pairwise similarity search.
pub trait ISimilarityProvider: Send + Sync {
    /// All pairs among `documents` scoring at or above `threshold`.
    fn find_similar_pairs(
        &self,
        documents: &[Document],
        threshold: f64,
    ) -> Result<Vec<SimilarityPair>, StoreError>;
}

impl<T: ISimilarityProvider + ?Sized> ISimilarityProvider for Arc<T> {
    fn find_similar_pairs(
        &self,
        documents: &[Document],
        threshold: f64,
    ) -> Result<Vec<SimilarityPair>, StoreError> {
        (**self).find_similar_pairs(documents, threshold)
    }
}
