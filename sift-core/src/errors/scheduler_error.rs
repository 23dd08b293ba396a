use crate::models::CleanupPhase;

/// Scheduler and maintenance-pass errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulerError {
    #[error("a maintenance pass is already in progress")]
    MaintenanceInProgress,

    #[error("phase {phase} is disabled")]
    PhaseDisabled { phase: CleanupPhase },

    #[error("phase {phase} failed: {reason}")]
    PhaseFailed { phase: CleanupPhase, reason: String },

    #[error("maintenance hook failed: {reason}")]
    HookFailed { reason: String },

    #[error("maintenance driver stopped")]
    DriverStopped,
}
