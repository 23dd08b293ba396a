/// Errors raised by the external vector store or similarity provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("collection not found: {collection}")]
    CollectionNotFound { collection: String },

    #[error("similarity provider failed: {reason}")]
    SimilarityFailed { reason: String },

    #[error("store operation timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

impl StoreError {
    /// Transient errors are expected to clear on a later retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}
