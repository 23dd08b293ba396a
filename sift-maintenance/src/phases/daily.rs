//! Daily: near-exact duplicates in the most active collection.

use sift_core::errors::SiftResult;
use sift_observability::tracing_setup::events;
use tracing::warn;

use super::PhaseRuntime;
use crate::report::PhaseReport;
use crate::scheduler::PhaseContext;

pub(super) fn run(rt: &mut PhaseRuntime, ctx: &PhaseContext) -> SiftResult<PhaseReport> {
    let config = rt.config.cleanup.daily.clone();
    let mut report = PhaseReport::new(ctx);
    if !rt.config.dedup.enabled {
        report.message = "deduplication disabled".into();
        return Ok(report);
    }

    let Some(collection) = most_active(rt, &config.collections, &mut report) else {
        report.message = "no collection available".into();
        return Ok(report);
    };
    events::phase_started(ctx.phase, &ctx.run_id, 1);

    let planner = rt.planner();
    let pass = rt.dedup_collection(&planner, ctx, &collection, config.similarity_threshold, &ctx.budget);
    report.absorb(pass);
    report.message = format!(
        "removed {} near-exact duplicates from {collection}",
        report.documents_removed
    );
    Ok(report)
}

/// The configured collection holding the most documents. Every count
/// failure lands in the report and fails the phase; the busiest countable
/// collection is still processed.
fn most_active(rt: &PhaseRuntime, collections: &[String], report: &mut PhaseReport) -> Option<String> {
    if let [only] = collections {
        return Some(only.clone());
    }
    let mut best: Option<(&String, usize)> = None;
    for collection in collections {
        match rt.store.count(collection) {
            Ok(n) => {
                if best.map_or(true, |(_, most)| n > most) {
                    best = Some((collection, n));
                }
            }
            Err(e) => {
                warn!(collection = %collection, error = %e, "count failed");
                report.push_error(Some(collection.as_str()), e.to_string());
            }
        }
    }
    best.map(|(collection, _)| collection.clone())
}
