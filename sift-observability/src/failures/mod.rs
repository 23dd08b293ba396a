//! Phase failure tracking.

pub mod tracker;

pub use tracker::{FailureTracker, PhaseFailure, RecoveryStatus};
