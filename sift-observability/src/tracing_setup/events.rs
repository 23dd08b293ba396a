//! Structured log events for maintenance operations.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

use sift_core::models::CleanupPhase;

pub fn phase_started(phase: CleanupPhase, run_id: &str, collections: usize) {
    tracing::info!(
        event = "phase_started",
        phase = %phase,
        run_id = %run_id,
        collections = collections,
        "cleanup phase started"
    );
}

pub fn phase_completed(phase: CleanupPhase, processed: usize, removed: usize, elapsed_ms: u64) {
    tracing::info!(
        event = "phase_completed",
        phase = %phase,
        processed = processed,
        removed = removed,
        elapsed_ms = elapsed_ms,
        "cleanup phase completed"
    );
}

pub fn phase_failed(phase: CleanupPhase, collection: Option<&str>, error: &str) {
    tracing::warn!(
        event = "phase_failed",
        phase = %phase,
        collection = collection.unwrap_or("-"),
        error = %error,
        "cleanup phase failed"
    );
}

pub fn phase_recovered(phase: CleanupPhase, failures_cleared: usize) {
    tracing::info!(
        event = "phase_recovered",
        phase = %phase,
        failures_cleared = failures_cleared,
        "cleanup phase recovered"
    );
}

pub fn documents_removed(collection: &str, removed: usize, pending: usize) {
    tracing::info!(
        event = "documents_removed",
        collection = %collection,
        removed = removed,
        pending = pending,
        "duplicate documents removed"
    );
}

pub fn thresholds_optimized(strategy: &str, effectiveness: f64, adjustments: usize) {
    tracing::info!(
        event = "thresholds_optimized",
        strategy = %strategy,
        effectiveness = effectiveness,
        adjustments = adjustments,
        "thresholds optimized"
    );
}

pub fn config_fallback(error: &str) {
    tracing::warn!(
        event = "config_fallback",
        error = %error,
        "invalid configuration, using defaults"
    );
}

pub fn budget_exhausted(phase: CleanupPhase, collection: &str, skipped_clusters: usize) {
    tracing::warn!(
        event = "budget_exhausted",
        phase = %phase,
        collection = %collection,
        skipped_clusters = skipped_clusters,
        "time budget exhausted"
    );
}
