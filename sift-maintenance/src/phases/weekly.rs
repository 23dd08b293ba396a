//! Weekly: similar documents across every primary collection.

use sift_core::errors::SiftResult;
use sift_observability::tracing_setup::events;

use super::PhaseRuntime;
use crate::report::PhaseReport;
use crate::scheduler::PhaseContext;

pub(super) fn run(rt: &mut PhaseRuntime, ctx: &PhaseContext) -> SiftResult<PhaseReport> {
    let config = rt.config.cleanup.weekly.clone();
    let mut report = PhaseReport::new(ctx);
    if !rt.config.dedup.enabled {
        report.message = "deduplication disabled".into();
        return Ok(report);
    }
    events::phase_started(ctx.phase, &ctx.run_id, config.collections.len());

    let planner = rt.planner();
    for collection in &config.collections {
        let share = ctx.budget.share(config.collections.len());
        let pass = rt.dedup_collection(&planner, ctx, collection, config.similarity_threshold, &share);
        report.absorb(pass);
    }

    report.message = format!(
        "processed {} documents, removed {} similar items",
        report.documents_processed, report.documents_removed
    );
    Ok(report)
}
