use serde::{Deserialize, Serialize};

use super::DocumentId;

/// Outcome of one batched delete against the vector store.
///
/// Ids that were already absent land in `missing` and count as success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteReport {
    pub deleted: Vec<DocumentId>,
    pub missing: Vec<DocumentId>,
    pub failed: Vec<(DocumentId, String)>,
}

impl DeleteReport {
    /// Ids no longer present in the store, whoever removed them.
    pub fn removed_count(&self) -> usize {
        self.deleted.len() + self.missing.len()
    }

    pub fn pending_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty() && self.removed_count() > 0
    }

    pub fn merge(&mut self, other: DeleteReport) {
        self.deleted.extend(other.deleted);
        self.missing.extend(other.missing);
        self.failed.extend(other.failed);
    }
}
