//! Cooperative scheduler for the three cleanup phases.
//!
//! Phases run in the fixed order Daily → Weekly → Monthly. A failed phase
//! keeps its `last_run`, so it stays due and is retried on the next tick;
//! it never stops the phases after it.

mod state;

pub use state::{PhaseState, PhaseStatus, SchedulerSnapshot};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sift_core::config::CleanupConfig;
use sift_core::errors::SiftResult;
use sift_core::models::CleanupPhase;
use sift_observability::tracing_setup::events;
use tracing::debug;

use crate::budget::Budget;
use crate::report::PhaseReport;

/// Everything a handler needs to know about the run it is executing.
#[derive(Debug, Clone)]
pub struct PhaseContext {
    pub phase: CleanupPhase,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub budget: Budget,
}

/// Executes one phase. Returning `Err`, or a report with errors, fails it.
pub trait PhaseHandler {
    fn run_phase(&mut self, ctx: &PhaseContext) -> SiftResult<PhaseReport>;
}

/// Reports of every phase run by one `run_due_phases` call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerRun {
    pub phases: Vec<PhaseReport>,
    pub documents_processed: usize,
    pub documents_removed: usize,
}

impl SchedulerRun {
    pub fn report(&self, phase: CleanupPhase) -> Option<&PhaseReport> {
        self.phases.iter().find(|r| r.phase == phase)
    }

    pub fn failed_phases(&self) -> Vec<CleanupPhase> {
        self.phases
            .iter()
            .filter(|r| !r.succeeded())
            .map(|r| r.phase)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CleanupScheduler {
    states: [PhaseState; 3],
}

fn slot(phase: CleanupPhase) -> usize {
    match phase {
        CleanupPhase::Daily => 0,
        CleanupPhase::Weekly => 1,
        CleanupPhase::Monthly => 2,
    }
}

impl CleanupScheduler {
    pub fn new(config: &CleanupConfig, now: DateTime<Utc>) -> Self {
        let grace = config.startup_grace_hours;
        Self {
            states: CleanupPhase::ALL.map(|phase| PhaseState::anchored(phase, config.phase(phase), grace, now)),
        }
    }

    pub fn state(&self, phase: CleanupPhase) -> &PhaseState {
        &self.states[slot(phase)]
    }

    pub fn is_due_at(&self, phase: CleanupPhase, now: DateTime<Utc>) -> bool {
        self.state(phase).is_due_at(now)
    }

    pub fn due_phases_at(&self, now: DateTime<Utc>) -> Vec<CleanupPhase> {
        CleanupPhase::ALL
            .into_iter()
            .filter(|&phase| self.is_due_at(phase, now))
            .collect()
    }

    /// Run one phase regardless of its timer.
    pub fn run_phase_at<H: PhaseHandler + ?Sized>(
        &mut self,
        handler: &mut H,
        phase: CleanupPhase,
        now: DateTime<Utc>,
    ) -> PhaseReport {
        let ctx = PhaseContext {
            phase,
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: now,
            budget: self.state(phase).budget(),
        };
        let span = sift_observability::maintenance_span!(phase, ctx.run_id);
        let _entered = span.enter();

        let mut report = match handler.run_phase(&ctx) {
            Ok(report) => report,
            Err(e) => PhaseReport::failed(&ctx, e.to_string()),
        };
        report.elapsed_ms = u64::try_from(ctx.budget.elapsed().as_millis()).unwrap_or(u64::MAX);

        if report.succeeded() {
            self.states[slot(phase)].last_run = now;
            events::phase_completed(
                phase,
                report.documents_processed,
                report.documents_removed,
                report.elapsed_ms,
            );
        } else {
            debug!(phase = %phase, errors = report.errors.len(), "phase left due for retry");
        }
        report
    }

    /// Run every due phase in order. One phase's failure never stops the
    /// phases after it.
    pub fn run_due_phases_at<H: PhaseHandler + ?Sized>(&mut self, handler: &mut H, now: DateTime<Utc>) -> SchedulerRun {
        let mut run = SchedulerRun::default();
        for phase in self.due_phases_at(now) {
            let report = self.run_phase_at(handler, phase, now);
            run.documents_processed += report.documents_processed;
            run.documents_removed += report.documents_removed;
            run.phases.push(report);
        }
        run
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> Vec<PhaseStatus> {
        self.states.iter().map(|s| s.status_at(now)).collect()
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            last_runs: self.states.iter().map(|s| (s.phase, s.last_run)).collect(),
        }
    }

    /// Apply persisted `last_run` values; phases missing from the snapshot
    /// keep their current anchor.
    pub fn restore(&mut self, snapshot: &SchedulerSnapshot) {
        for (phase, last_run) in &snapshot.last_runs {
            self.restore_last_run(*phase, *last_run);
        }
    }

    pub fn restore_last_run(&mut self, phase: CleanupPhase, last_run: DateTime<Utc>) {
        self.states[slot(phase)].last_run = last_run;
    }
}
