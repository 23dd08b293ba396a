//! Phase and collection results returned to the host.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sift_core::models::CleanupPhase;

use crate::phases::insights::Insight;
use crate::scheduler::PhaseContext;

/// One dedup pass over one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionReport {
    pub collection: String,
    pub documents_processed: usize,
    pub duplicates_found: usize,
    pub documents_removed: usize,
    /// Duplicates the store failed to delete; retried by a later pass.
    pub documents_pending: usize,
    /// Merge decisions not applied because the budget ran out.
    pub skipped_clusters: usize,
    pub budget_exhausted: bool,
    pub error: Option<String>,
}

impl CollectionReport {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseError {
    pub collection: Option<String>,
    pub message: String,
}

/// Outcome of the monthly secondary maintenance hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookReport {
    pub name: String,
    pub documents_touched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub phase: CleanupPhase,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub documents_processed: usize,
    pub documents_removed: usize,
    pub documents_pending: usize,
    pub message: String,
    pub errors: Vec<PhaseError>,
    pub collections: Vec<CollectionReport>,
    pub insights: Vec<Insight>,
    pub hook: Option<HookReport>,
    pub budget_exhausted: bool,
    pub elapsed_ms: u64,
}

impl PhaseReport {
    pub fn new(ctx: &PhaseContext) -> Self {
        Self {
            phase: ctx.phase,
            run_id: ctx.run_id.clone(),
            started_at: ctx.started_at,
            documents_processed: 0,
            documents_removed: 0,
            documents_pending: 0,
            message: String::new(),
            errors: Vec::new(),
            collections: Vec::new(),
            insights: Vec::new(),
            hook: None,
            budget_exhausted: false,
            elapsed_ms: 0,
        }
    }

    /// A report for a handler that failed before producing one.
    pub fn failed(ctx: &PhaseContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut report = Self::new(ctx);
        report.message = format!("{} cleanup failed: {message}", ctx.phase);
        report.errors.push(PhaseError {
            collection: None,
            message,
        });
        report
    }

    /// Any recorded error fails the phase, even when other collections
    /// completed.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, collection: Option<&str>, message: impl Into<String>) {
        self.errors.push(PhaseError {
            collection: collection.map(str::to_string),
            message: message.into(),
        });
    }

    /// Fold one collection pass into the phase totals.
    pub fn absorb(&mut self, collection: CollectionReport) {
        self.documents_processed += collection.documents_processed;
        self.documents_removed += collection.documents_removed;
        self.documents_pending += collection.documents_pending;
        self.budget_exhausted |= collection.budget_exhausted;
        if let Some(error) = &collection.error {
            self.push_error(Some(&collection.collection), error.clone());
        }
        self.collections.push(collection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::Budget;

    fn ctx() -> PhaseContext {
        PhaseContext {
            phase: CleanupPhase::Weekly,
            run_id: "run".into(),
            started_at: Utc::now(),
            budget: Budget::from_secs(1),
        }
    }

    #[test]
    fn absorb_sums_counts_and_keeps_errors() {
        let mut report = PhaseReport::new(&ctx());
        let mut ok = CollectionReport::new("short_term");
        ok.documents_processed = 10;
        ok.documents_removed = 3;
        ok.documents_pending = 1;
        let mut bad = CollectionReport::new("long_term");
        bad.error = Some("store unavailable".into());

        report.absorb(ok);
        report.absorb(bad);

        assert_eq!(report.documents_processed, 10);
        assert_eq!(report.documents_removed, 3);
        assert_eq!(report.documents_pending, 1);
        assert_eq!(report.collections.len(), 2);
        assert!(!report.succeeded());
        assert_eq!(report.errors[0].collection.as_deref(), Some("long_term"));
    }

    #[test]
    fn failed_report_carries_message() {
        let report = PhaseReport::failed(&ctx(), "boom");
        assert!(!report.succeeded());
        assert!(report.message.contains("weekly"));
        assert_eq!(report.errors[0].message, "boom");
    }
}
