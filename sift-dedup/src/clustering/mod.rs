//! Near-duplicate clustering from similarity pairs.

mod builder;
mod history;
mod summary;

pub use builder::{Cluster, ClusterBuilder, ClusterOutcome, ClusteringReport};
pub use history::{ClusterHistory, ClusterSnapshot};
pub use summary::{ClusterSummary, SizeDistribution};
