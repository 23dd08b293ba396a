//! # sift-core
//!
//! Foundation crate for the sift deduplication and maintenance engine.
//! Defines documents, thresholds, config, errors, and the collaborator traits
//! (vector store, similarity provider, maintenance hook).
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::SiftConfig;
pub use errors::{SiftError, SiftResult};
pub use models::{
    CleanupPhase, DeleteReport, Document, DocumentId, Domain, SimilarityPair, ThresholdConfig,
};
