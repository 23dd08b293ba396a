mod config_error;
mod dedup_error;
mod scheduler_error;
mod store_error;

pub use config_error::ConfigError;
pub use dedup_error::DedupError;
pub use scheduler_error::SchedulerError;
pub use store_error::StoreError;

/// Top-level error for every sift crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SiftError {
    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("dedup error: {0}")]
    DedupError(#[from] DedupError),

    #[error("scheduler error: {0}")]
    SchedulerError(#[from] SchedulerError),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SiftError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

pub type SiftResult<T> = Result<T, SiftError>;
