//! # sift-observability
//!
//! Structured tracing (subscriber setup, one function per notable event,
//! span macros) and a failure tracker that keeps every phase failure until
//! the phase succeeds again.

pub mod failures;
pub mod tracing_setup;

pub use failures::{FailureTracker, PhaseFailure, RecoveryStatus};
