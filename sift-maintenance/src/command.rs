//! Messages a host sends to the engine, and what comes back.

use serde::Serialize;
use sift_core::models::CleanupPhase;
use sift_tuning::OptimizationOutcome;

use crate::report::PhaseReport;
use crate::scheduler::{PhaseStatus, SchedulerRun};

#[derive(Debug, Clone, PartialEq)]
pub enum MaintenanceCommand {
    /// Run every due phase, then the optimizer when it is due.
    Tick,
    /// Run one phase now, ignoring its timer.
    RunPhase(CleanupPhase),
    Optimize { external_effectiveness: Option<f64> },
    Status,
    Shutdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResponse {
    Ticked {
        run: SchedulerRun,
        optimization: Option<OptimizationOutcome>,
    },
    PhaseRan {
        report: PhaseReport,
    },
    Optimized {
        outcome: OptimizationOutcome,
    },
    Status {
        phases: Vec<PhaseStatus>,
    },
    Stopped,
}
