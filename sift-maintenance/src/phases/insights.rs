//! Storage insights produced by the monthly phase.

use std::collections::BTreeMap;

use serde::Serialize;
use sift_core::config::InsightConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    CollectionImbalance,
    LowEffectiveness,
    LargeVolume,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    pub recommendation: String,
}

/// Insights from per-collection document counts and lifetime dedup
/// effectiveness (percent).
pub fn generate(
    counts: &BTreeMap<String, usize>,
    effectiveness_percent: Option<f64>,
    config: &InsightConfig,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let largest = counts.iter().max_by_key(|entry| *entry.1);
    let smallest = counts.iter().min_by_key(|entry| *entry.1);
    if let (Some((big, &big_n)), Some((small, &small_n))) = (largest, smallest) {
        if big != small && big_n > 0 && big_n as f64 > small_n as f64 * config.imbalance_ratio {
            insights.push(Insight {
                kind: InsightKind::CollectionImbalance,
                message: format!("{big} holds {big_n} documents against {small_n} in {small}"),
                recommendation: format!("promote or consolidate documents out of {big} more aggressively"),
            });
        }
    }

    if let Some(percent) = effectiveness_percent {
        if percent < config.low_effectiveness_percent {
            insights.push(Insight {
                kind: InsightKind::LowEffectiveness,
                message: format!("deduplication removed {percent:.1}% of processed documents"),
                recommendation: "lower the similarity thresholds or review the domain map".into(),
            });
        }
    }

    let total: usize = counts.values().sum();
    if total > config.large_volume_threshold {
        insights.push(Insight {
            kind: InsightKind::LargeVolume,
            message: format!("{total} documents stored across {} collections", counts.len()),
            recommendation: "run deep cleanup more often or archive old documents".into(),
        });
    }

    insights
}
