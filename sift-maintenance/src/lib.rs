//! # sift-maintenance
//!
//! Phased maintenance over an external vector store: Daily, Weekly and
//! Monthly cleanup under wall-clock budgets, insight generation, the
//! `MaintenanceEngine` facade, and an optional tokio driver.

pub mod budget;
pub mod command;
pub mod driver;
pub mod engine;
pub mod phases;
pub mod report;
pub mod scheduler;
pub mod stats;

pub use budget::Budget;
pub use command::{CommandResponse, MaintenanceCommand};
pub use driver::DriverHandle;
pub use engine::{AdvancedStats, MaintenanceEngine};
pub use phases::insights::{Insight, InsightKind};
pub use phases::PhaseRuntime;
pub use report::{CollectionReport, HookReport, PhaseError, PhaseReport};
pub use scheduler::{CleanupScheduler, PhaseContext, PhaseHandler, PhaseStatus, SchedulerRun, SchedulerSnapshot};
pub use stats::DedupStats;
