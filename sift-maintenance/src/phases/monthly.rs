//! Monthly: deep dedup of every collection, the secondary maintenance
//! hook, then storage insights.
//!
//! Dedup gets a third of the budget, split evenly across collections. The
//! hook starts only while budget remains and gets half the allowance,
//! capped by what dedup left; it cannot be interrupted, so an overrun is
//! logged. Insights are count reads and always run.

use std::collections::BTreeMap;

use sift_core::errors::SiftResult;
use sift_observability::tracing_setup::events;
use tracing::{info, warn};

use super::{insights, PhaseRuntime};
use crate::budget::Budget;
use crate::report::{HookReport, PhaseReport};
use crate::scheduler::PhaseContext;

const SUB_PHASES: usize = 3;

pub(super) fn run(rt: &mut PhaseRuntime, ctx: &PhaseContext) -> SiftResult<PhaseReport> {
    let config = rt.config.cleanup.monthly.clone();
    let mut report = PhaseReport::new(ctx);
    events::phase_started(ctx.phase, &ctx.run_id, config.collections.len());

    if rt.config.dedup.enabled {
        let dedup_budget = ctx.budget.share(SUB_PHASES);
        let planner = rt.planner();
        for collection in &config.collections {
            let share = dedup_budget.share(config.collections.len());
            let pass = rt.dedup_collection(&planner, ctx, collection, config.similarity_threshold, &share);
            report.absorb(pass);
        }
    }

    let hook_budget = ctx.budget.share(2);
    run_hook(rt, &hook_budget, &mut report);

    let mut counts = BTreeMap::new();
    for collection in &config.collections {
        match rt.store.count(collection) {
            Ok(n) => {
                counts.insert(collection.clone(), n);
            }
            Err(e) => report.push_error(Some(collection.as_str()), e.to_string()),
        }
    }
    report.insights = insights::generate(
        &counts,
        rt.stats.effectiveness_percent(),
        &rt.config.cleanup.insights,
    );

    report.message = format!(
        "deep cleanup processed {} documents, removed {}, {} insights",
        report.documents_processed,
        report.documents_removed,
        report.insights.len()
    );
    Ok(report)
}

fn run_hook(rt: &PhaseRuntime, budget: &Budget, report: &mut PhaseReport) {
    let Some(hook) = rt.hook.as_ref() else {
        return;
    };
    if budget.is_exhausted() {
        report.budget_exhausted = true;
        warn!(hook = hook.name(), "budget exhausted before maintenance hook");
        return;
    }
    match hook.run() {
        Ok(touched) => {
            if budget.is_exhausted() {
                warn!(
                    hook = hook.name(),
                    allowance_ms = u64::try_from(budget.allowance().as_millis()).unwrap_or(u64::MAX),
                    "maintenance hook overran its budget"
                );
            }
            info!(hook = hook.name(), touched, "maintenance hook finished");
            report.hook = Some(HookReport {
                name: hook.name().to_string(),
                documents_touched: touched,
            });
        }
        Err(e) => report.push_error(None, e.to_string()),
    }
}
