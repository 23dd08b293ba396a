//! MaintenanceEngine: the in-process facade, `Arc<AtomicBool>` single-writer guard.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sift_core::config::SiftConfig;
use sift_core::errors::{ConfigError, SchedulerError, SiftError, SiftResult};
use sift_core::models::{CleanupPhase, Domain, ThresholdConfig};
use sift_core::traits::{IMaintenanceHook, ISimilarityProvider, IVectorStore};
use sift_dedup::{ClusterBuilder, ClusterHistory, ClusterOutcome, DedupOutcome, DomainAnalysis};
use sift_observability::tracing_setup::events;
use sift_observability::FailureTracker;
use sift_tuning::{EffectivenessTracker, OptimizationOutcome, ThresholdOptimizer, Trend};
use tracing::info;

use crate::command::{CommandResponse, MaintenanceCommand};
use crate::phases::PhaseRuntime;
use crate::report::PhaseReport;
use crate::scheduler::{CleanupScheduler, PhaseStatus, SchedulerRun, SchedulerSnapshot};
use crate::stats::DedupStats;

/// Threshold, clustering and tuning state in one view.
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedStats {
    pub base_threshold: f64,
    pub domain_thresholds: BTreeMap<Domain, f64>,
    pub domain_aware: bool,
    pub active_cluster_count: usize,
    pub optimization_count: usize,
    pub last_optimization: Option<DateTime<Utc>>,
    pub next_optimization: Option<DateTime<Utc>>,
    pub effectiveness_trend: Trend,
    pub current_effectiveness: Option<f64>,
    pub domain_effectiveness: BTreeMap<String, f64>,
    pub dedup: DedupStats,
    pub active_failures: usize,
}

/// Releases the running flag however the pass ends.
struct RunGuard {
    flag: Arc<AtomicBool>,
}

impl RunGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> SiftResult<Self> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SiftError::SchedulerError(SchedulerError::MaintenanceInProgress));
        }
        Ok(Self { flag: Arc::clone(flag) })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Owns the scheduler, the live thresholds and every piece of tuning
/// state. Phase runs and optimizer runs take the same guard, so at most
/// one of them is in flight.
pub struct MaintenanceEngine {
    is_running: Arc<AtomicBool>,
    scheduler: CleanupScheduler,
    runtime: PhaseRuntime,
    optimizer: ThresholdOptimizer,
    cluster_history: ClusterHistory,
    failures: FailureTracker,
    config_warnings: Vec<ConfigError>,
}

impl MaintenanceEngine {
    /// Engine whose phases are anchored at the current time.
    pub fn new(config: SiftConfig, store: Arc<dyn IVectorStore>, provider: Arc<dyn ISimilarityProvider>) -> Self {
        Self::new_at(config, store, provider, Utc::now())
    }

    /// Invalid config sections fall back to their defaults; the violations
    /// are logged and kept in `config_warnings`.
    pub fn new_at(
        config: SiftConfig,
        store: Arc<dyn IVectorStore>,
        provider: Arc<dyn ISimilarityProvider>,
        now: DateTime<Utc>,
    ) -> Self {
        let (config, mut warnings) = config.sanitize();
        let thresholds = ThresholdConfig::from_config(&config.dedup).unwrap_or_else(|e| {
            warnings.push(e);
            ThresholdConfig::default()
        });
        for warning in &warnings {
            events::config_fallback(&warning.to_string());
        }

        let scheduler = CleanupScheduler::new(&config.cleanup, now);
        let optimizer = ThresholdOptimizer::new(config.optimization.clone());
        let cluster_history = ClusterHistory::new(config.clustering.cluster_refresh_hours);
        info!(
            base_threshold = thresholds.base_threshold(),
            domain_aware = config.dedup.enable_domain_aware_thresholds,
            warnings = warnings.len(),
            "maintenance engine started"
        );

        Self {
            is_running: Arc::new(AtomicBool::new(false)),
            scheduler,
            runtime: PhaseRuntime::new(store, provider, config, thresholds),
            optimizer,
            cluster_history,
            failures: FailureTracker::default(),
            config_warnings: warnings,
        }
    }

    /// Build from a TOML string. A parse failure yields the default config
    /// plus the parse error as a warning.
    pub fn from_toml(toml_str: &str, store: Arc<dyn IVectorStore>, provider: Arc<dyn ISimilarityProvider>) -> Self {
        Self::from_toml_at(toml_str, store, provider, Utc::now())
    }

    pub fn from_toml_at(
        toml_str: &str,
        store: Arc<dyn IVectorStore>,
        provider: Arc<dyn ISimilarityProvider>,
        now: DateTime<Utc>,
    ) -> Self {
        match SiftConfig::from_toml(toml_str) {
            Ok(config) => Self::new_at(config, store, provider, now),
            Err(e) => {
                events::config_fallback(&e.to_string());
                let mut engine = Self::new_at(SiftConfig::default(), store, provider, now);
                engine.config_warnings.insert(0, e);
                engine
            }
        }
    }

    /// Attach the hook the monthly phase runs after deep dedup.
    pub fn with_hook(mut self, hook: Arc<dyn IMaintenanceHook>) -> Self {
        self.runtime.hook = Some(hook);
        self
    }

    /// True while a phase or an optimizer run holds the guard.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Shared handle to the running flag, for hosts that watch it from
    /// another thread.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.is_running)
    }

    /// The effective config, after invalid sections fell back.
    pub fn config(&self) -> &SiftConfig {
        &self.runtime.config
    }

    /// Violations found while loading the config. Empty when it was valid.
    pub fn config_warnings(&self) -> &[ConfigError] {
        &self.config_warnings
    }

    /// Live thresholds, as last moved by the optimizer.
    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.runtime.thresholds
    }

    pub fn effectiveness(&self) -> &EffectivenessTracker {
        &self.runtime.tracker
    }

    /// Lifetime counters across every pass.
    pub fn stats(&self) -> DedupStats {
        self.runtime.stats
    }

    pub fn failures(&self) -> &FailureTracker {
        &self.failures
    }

    pub fn optimizer(&self) -> &ThresholdOptimizer {
        &self.optimizer
    }

    pub fn cluster_history(&self) -> &ClusterHistory {
        &self.cluster_history
    }

    /// `last_run` of every phase, for hosts that persist it across restarts.
    pub fn scheduler_snapshot(&self) -> SchedulerSnapshot {
        self.scheduler.snapshot()
    }

    /// Apply a persisted snapshot. Phases missing from it keep their current
    /// anchor.
    pub fn restore_scheduler(&mut self, snapshot: &SchedulerSnapshot) {
        self.scheduler.restore(snapshot);
    }

    // --- Phases ---

    /// Forced run, ignoring the phase timer.
    pub fn run_phase(&mut self, phase: CleanupPhase) -> SiftResult<PhaseReport> {
        self.run_phase_at(phase, Utc::now())
    }

    /// Run one enabled phase now. Failures inside the phase come back in the
    /// report; `Err` means the phase could not start.
    pub fn run_phase_at(&mut self, phase: CleanupPhase, now: DateTime<Utc>) -> SiftResult<PhaseReport> {
        let _guard = RunGuard::acquire(&self.is_running)?;
        if !self.scheduler.state(phase).enabled {
            return Err(SchedulerError::PhaseDisabled { phase }.into());
        }
        let report = self.scheduler.run_phase_at(&mut self.runtime, phase, now);
        self.settle(&report, now);
        Ok(report)
    }

    pub fn run_due_phases(&mut self) -> SiftResult<SchedulerRun> {
        self.run_due_phases_at(Utc::now())
    }

    /// Run every due phase in daily, weekly, monthly order. One phase
    /// failing does not stop the ones after it.
    pub fn run_due_phases_at(&mut self, now: DateTime<Utc>) -> SiftResult<SchedulerRun> {
        let _guard = RunGuard::acquire(&self.is_running)?;
        let run = self.scheduler.run_due_phases_at(&mut self.runtime, now);
        for report in &run.phases {
            self.settle(report, now);
        }
        Ok(run)
    }

    /// Record the errors of a failed phase, or clear the failures of a
    /// phase that succeeded.
    fn settle(&mut self, report: &PhaseReport, now: DateTime<Utc>) {
        if report.succeeded() {
            self.failures.mark_recovered(report.phase, now);
        } else {
            for error in &report.errors {
                self.failures
                    .record_at(report.phase, error.collection.as_deref(), error.message.clone(), now);
            }
        }
    }

    pub fn status(&self) -> Vec<PhaseStatus> {
        self.status_at(Utc::now())
    }

    /// Schedule view of every phase: last and next run, and whether it is due.
    pub fn status_at(&self, now: DateTime<Utc>) -> Vec<PhaseStatus> {
        self.scheduler.status_at(now)
    }

    // --- Tuning ---

    pub fn optimize_thresholds(&mut self, external_effectiveness: Option<f64>) -> SiftResult<OptimizationOutcome> {
        self.optimize_thresholds_at(external_effectiveness, Utc::now())
    }

    /// Tune thresholds from tracked effectiveness, or from
    /// `external_effectiveness` when the host supplies a figure. Takes the
    /// run guard.
    pub fn optimize_thresholds_at(
        &mut self,
        external_effectiveness: Option<f64>,
        now: DateTime<Utc>,
    ) -> SiftResult<OptimizationOutcome> {
        let _guard = RunGuard::acquire(&self.is_running)?;
        let outcome = self.optimizer.optimize_at(
            &mut self.runtime.thresholds,
            &self.runtime.tracker,
            external_effectiveness,
            self.runtime.stats.cumulative(),
            now,
        );
        if let OptimizationOutcome::Optimized { record, .. } = &outcome {
            let span = sift_observability::optimization_span!(record.source);
            let _entered = span.enter();
            events::thresholds_optimized(
                record.strategy.as_str(),
                record.effectiveness,
                record.adjustments.len(),
            );
        }
        Ok(outcome)
    }

    /// Optimize when the interval has elapsed and at least one pass has
    /// been observed since startup.
    fn maybe_optimize_at(&mut self, now: DateTime<Utc>) -> SiftResult<Option<OptimizationOutcome>> {
        if self.runtime.tracker.is_empty() || !self.optimizer.is_due_at(now) {
            return Ok(None);
        }
        self.optimize_thresholds_at(None, now).map(Some)
    }

    pub fn advanced_stats(&mut self) -> AdvancedStats {
        self.advanced_stats_at(Utc::now())
    }

    /// Prunes expired cluster snapshots before reporting.
    pub fn advanced_stats_at(&mut self, now: DateTime<Utc>) -> AdvancedStats {
        self.cluster_history.prune_at(now);
        let tracker = &self.runtime.tracker;
        AdvancedStats {
            base_threshold: self.runtime.thresholds.base_threshold(),
            domain_thresholds: self.runtime.thresholds.domain_thresholds().clone(),
            domain_aware: self.runtime.config.dedup.enable_domain_aware_thresholds,
            active_cluster_count: self.cluster_history.active_cluster_count(),
            optimization_count: self.optimizer.optimization_count(),
            last_optimization: self.optimizer.last_run(),
            next_optimization: self.optimizer.next_optimization_time(),
            effectiveness_trend: tracker.trend(),
            current_effectiveness: tracker.current(),
            domain_effectiveness: tracker.domain_effectiveness(),
            dedup: self.runtime.stats,
            active_failures: self.failures.active_failures().len(),
        }
    }

    // --- Read-only analysis ---

    pub fn analyze_clusters(&mut self, collection: &str) -> SiftResult<ClusterOutcome> {
        self.analyze_clusters_at(collection, Utc::now())
    }

    /// Cluster a collection at `cluster_threshold` and keep the summary in
    /// the cluster history. Nothing is deleted.
    pub fn analyze_clusters_at(&mut self, collection: &str, now: DateTime<Utc>) -> SiftResult<ClusterOutcome> {
        let config = &self.runtime.config.clustering;
        if !config.enabled {
            return Ok(ClusterOutcome::Disabled);
        }
        let documents = self.runtime.store.list(collection)?;
        let pairs = self
            .runtime
            .provider
            .find_similar_pairs(&documents, config.cluster_threshold)?;
        let outcome = ClusterBuilder::from_config(config).build(&pairs);
        if let ClusterOutcome::Clustered(report) = &outcome {
            let id = self
                .cluster_history
                .record_at(collection, documents.len(), report.summary.clone(), now);
            info!(
                collection,
                snapshot = %id,
                clusters = report.summary.cluster_count,
                "cluster analysis recorded"
            );
        }
        Ok(outcome)
    }

    /// What a dedup pass at the base threshold would remove. Nothing is
    /// deleted.
    pub fn preview_duplicates(&self, collection: &str) -> SiftResult<DedupOutcome> {
        let documents = self.runtime.store.list(collection)?;
        let planner = self.runtime.planner();
        let outcome = planner.plan(
            &documents,
            self.runtime.provider.as_ref(),
            self.runtime.thresholds.base_threshold(),
        )?;
        Ok(outcome)
    }

    /// Domain distribution and per-domain thresholds of a collection.
    pub fn domain_analysis(&self, collection: &str) -> SiftResult<DomainAnalysis> {
        let documents = self.runtime.store.list(collection)?;
        Ok(self
            .runtime
            .planner()
            .policy()
            .analyze_domains(&documents, self.runtime.thresholds.base_threshold()))
    }

    // --- Commands ---

    pub fn handle(&mut self, command: MaintenanceCommand) -> SiftResult<CommandResponse> {
        self.handle_at(command, Utc::now())
    }

    /// Dispatch one driver command. A tick runs due phases, then the
    /// optimizer when it is due.
    pub fn handle_at(&mut self, command: MaintenanceCommand, now: DateTime<Utc>) -> SiftResult<CommandResponse> {
        match command {
            MaintenanceCommand::Tick => {
                let run = self.run_due_phases_at(now)?;
                let optimization = self.maybe_optimize_at(now)?;
                Ok(CommandResponse::Ticked { run, optimization })
            }
            MaintenanceCommand::RunPhase(phase) => {
                let report = self.run_phase_at(phase, now)?;
                Ok(CommandResponse::PhaseRan { report })
            }
            MaintenanceCommand::Optimize { external_effectiveness } => {
                let outcome = self.optimize_thresholds_at(external_effectiveness, now)?;
                Ok(CommandResponse::Optimized { outcome })
            }
            MaintenanceCommand::Status => Ok(CommandResponse::Status {
                phases: self.status_at(now),
            }),
            MaintenanceCommand::Shutdown => Ok(CommandResponse::Stopped),
        }
    }
}
