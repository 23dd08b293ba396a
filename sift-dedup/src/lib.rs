//! # sift-dedup
//!
//! One dedup pass over a collection snapshot: classify → per-document
//! thresholds → accepted similarity pairs → clusters → merge decisions.
//! Deletion itself is left to the caller.

pub mod classifier;
pub mod clustering;
pub mod keeper;
pub mod planner;
pub mod threshold_policy;

pub use classifier::classify;
pub use clustering::{ClusterBuilder, ClusterHistory, ClusterOutcome, ClusterSummary};
pub use planner::{DedupOutcome, DedupPlan, DedupPlanner, MergeDecision};
pub use threshold_policy::{DomainAnalysis, ThresholdDecision, ThresholdPolicy};
