/// Deduplication subsystem errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DedupError {
    #[error("similarity pair references unknown document {id}")]
    UnknownDocument { id: String },

    #[error("similarity score {score} for ({a}, {b}) outside [0, 1]")]
    InvalidScore { a: String, b: String, score: f64 },

    #[error("clustering failed: {reason}")]
    ClusteringFailed { reason: String },
}
