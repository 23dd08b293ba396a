pub mod cleanup;
pub mod delete_report;
pub mod document;
pub mod domain;
pub mod similarity;
pub mod threshold;

pub use cleanup::CleanupPhase;
pub use delete_report::DeleteReport;
pub use document::{Document, DocumentId, Metadata};
pub use domain::Domain;
pub use similarity::SimilarityPair;
pub use threshold::ThresholdConfig;
