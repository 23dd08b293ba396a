//! # sift-tuning
//!
//! Feedback loop for the dedup thresholds: a bounded effectiveness history
//! and an optimizer that nudges `ThresholdConfig` towards a target.

pub mod effectiveness;
pub mod optimizer;

pub use effectiveness::{EffectivenessRecord, EffectivenessTracker, Trend};
pub use optimizer::{
    Adjustment, CumulativeStats, EffectivenessSource, OptimizationOutcome, OptimizationRecord,
    Strategy, ThresholdOptimizer,
};
