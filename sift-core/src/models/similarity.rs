use serde::{Deserialize, Serialize};

use super::DocumentId;

/// Two documents and the externally computed similarity between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    pub a: DocumentId,
    pub b: DocumentId,
    /// Normalized similarity (0.0–1.0).
    pub score: f64,
}

impl SimilarityPair {
    pub fn new(a: impl Into<DocumentId>, b: impl Into<DocumentId>, score: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            score,
        }
    }

    pub fn is_self_pair(&self) -> bool {
        self.a == self.b
    }
}
