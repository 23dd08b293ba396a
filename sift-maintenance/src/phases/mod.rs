//! Phase runners and the shared per-collection dedup pass.

mod daily;
pub mod insights;
mod monthly;
mod weekly;

use std::sync::Arc;

use sift_core::config::SiftConfig;
use sift_core::errors::SiftResult;
use sift_core::models::{CleanupPhase, Document, ThresholdConfig};
use sift_core::traits::{IMaintenanceHook, ISimilarityProvider, IVectorStore};
use sift_dedup::{DedupOutcome, DedupPlanner, ThresholdPolicy};
use sift_observability::tracing_setup::events;
use sift_tuning::EffectivenessTracker;
use tracing::warn;

use crate::budget::Budget;
use crate::report::{CollectionReport, PhaseReport};
use crate::scheduler::{PhaseContext, PhaseHandler};
use crate::stats::DedupStats;

/// State the phase runners read and update: collaborators, the live
/// thresholds, the effectiveness history and lifetime counters.
pub struct PhaseRuntime {
    pub(crate) store: Arc<dyn IVectorStore>,
    pub(crate) provider: Arc<dyn ISimilarityProvider>,
    pub(crate) hook: Option<Arc<dyn IMaintenanceHook>>,
    pub(crate) config: SiftConfig,
    pub(crate) thresholds: ThresholdConfig,
    pub(crate) tracker: EffectivenessTracker,
    pub(crate) stats: DedupStats,
}

impl PhaseRuntime {
    pub(crate) fn new(
        store: Arc<dyn IVectorStore>,
        provider: Arc<dyn ISimilarityProvider>,
        config: SiftConfig,
        thresholds: ThresholdConfig,
    ) -> Self {
        Self {
            store,
            provider,
            hook: None,
            config,
            thresholds,
            tracker: EffectivenessTracker::default(),
            stats: DedupStats::default(),
        }
    }

    /// A planner over a copy of the current thresholds. The optimizer may
    /// change the live set between phases, never during one.
    pub(crate) fn planner(&self) -> DedupPlanner {
        DedupPlanner::new(
            ThresholdPolicy::new(
                self.thresholds.clone(),
                self.config.dedup.enable_domain_aware_thresholds,
            ),
            self.config.dedup.enabled,
        )
    }

    /// List, plan and delete for one collection under `budget`.
    ///
    /// Store failures end the pass and land in the report's `error`. Once
    /// the budget runs out no further merge decision is applied; a delete
    /// already issued runs to completion.
    pub(crate) fn dedup_collection(
        &mut self,
        planner: &DedupPlanner,
        ctx: &PhaseContext,
        collection: &str,
        base_threshold: f64,
        budget: &Budget,
    ) -> CollectionReport {
        let mut report = CollectionReport::new(collection);
        if budget.is_exhausted() {
            report.budget_exhausted = true;
            events::budget_exhausted(ctx.phase, collection, 0);
            return report;
        }

        let documents = match self.store.list(collection) {
            Ok(documents) => documents,
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        };
        report.documents_processed = documents.len();
        let span = sift_observability::dedup_span!(collection, documents.len());
        let _entered = span.enter();

        let outcome = match planner.plan(&documents, self.provider.as_ref(), base_threshold) {
            Ok(outcome) => outcome,
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        };
        let decisions = outcome.decisions();
        report.duplicates_found = decisions.iter().map(|d| d.duplicates.len()).sum();

        for (applied, decision) in decisions.iter().enumerate() {
            if budget.is_exhausted() {
                report.budget_exhausted = true;
                report.skipped_clusters = decisions.len() - applied;
                events::budget_exhausted(ctx.phase, collection, report.skipped_clusters);
                break;
            }
            match self.store.delete(collection, &decision.duplicates) {
                Ok(deleted) => {
                    for (id, reason) in &deleted.failed {
                        warn!(collection, id = %id, reason = %reason, "duplicate left pending");
                    }
                    report.documents_removed += deleted.removed_count();
                    report.documents_pending += deleted.pending_count();
                }
                Err(e) => {
                    report.error = Some(e.to_string());
                    report.skipped_clusters = decisions.len() - applied - 1;
                    break;
                }
            }
        }

        if report.duplicates_found > 0 {
            events::documents_removed(collection, report.documents_removed, report.documents_pending);
        }
        if report.error.is_none() && !matches!(outcome, DedupOutcome::Disabled) {
            self.record_pass(planner, ctx.phase, &documents, &report, base_threshold);
        }
        report
    }

    /// Feed one completed pass into the effectiveness history and the
    /// lifetime counters.
    fn record_pass(
        &mut self,
        planner: &DedupPlanner,
        phase: CleanupPhase,
        documents: &[Document],
        report: &CollectionReport,
        base_threshold: f64,
    ) {
        self.stats.record(report);
        if report.documents_processed == 0 {
            return;
        }
        let score = report.documents_removed as f64 / report.documents_processed as f64;
        let mut context = sift_tuning::effectiveness::Context::new();
        context.insert("phase".into(), phase.to_string());
        context.insert("collection".into(), report.collection.clone());
        let analysis = planner.policy().analyze_domains(documents, base_threshold);
        if let Some((domain, _)) = analysis.distribution.iter().max_by_key(|entry| *entry.1) {
            context.insert("domain".into(), domain.to_string());
        }
        self.tracker.track(score, context);
    }
}

impl PhaseHandler for PhaseRuntime {
    fn run_phase(&mut self, ctx: &PhaseContext) -> SiftResult<PhaseReport> {
        match ctx.phase {
            CleanupPhase::Daily => daily::run(self, ctx),
            CleanupPhase::Weekly => weekly::run(self, ctx),
            CleanupPhase::Monthly => monthly::run(self, ctx),
        }
    }
}
