//! Bounded history of observed dedup effectiveness.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sift_core::constants::MAX_EFFECTIVENESS_RECORDS;

/// Scores considered by `trend`.
const TREND_WINDOW: usize = 5;
/// Of those, the most recent ones averaged as "recent".
const TREND_RECENT: usize = 3;
const IMPROVING_RATIO: f64 = 1.10;
const DECLINING_RATIO: f64 = 0.90;
/// Records grouped by `domain_effectiveness`.
const DOMAIN_WINDOW: usize = 10;

pub type Context = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessRecord {
    pub timestamp: DateTime<Utc>,
    /// Removed / processed for one pass, in [0, 1].
    pub score: f64,
    pub context: Context,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
            Self::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct EffectivenessTracker {
    capacity: usize,
    records: VecDeque<EffectivenessRecord>,
}

impl Default for EffectivenessTracker {
    fn default() -> Self {
        Self::new(MAX_EFFECTIVENESS_RECORDS)
    }
}

impl EffectivenessTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    pub fn track(&mut self, score: f64, context: Context) {
        self.track_at(score, context, Utc::now());
    }

    /// Append a record, evicting the oldest beyond capacity. Scores are
    /// clamped into [0, 1]; NaN counts as 0.
    pub fn track_at(&mut self, score: f64, context: Context, now: DateTime<Utc>) {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        self.records.push_back(EffectivenessRecord {
            timestamp: now,
            score,
            context,
        });
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &EffectivenessRecord> {
        self.records.iter()
    }

    /// Latest score.
    pub fn current(&self) -> Option<f64> {
        self.records.back().map(|r| r.score)
    }

    pub fn trend(&self) -> Trend {
        if self.records.len() < TREND_RECENT {
            return Trend::InsufficientData;
        }
        let scores: Vec<f64> = self
            .records
            .iter()
            .rev()
            .take(TREND_WINDOW)
            .rev()
            .map(|r| r.score)
            .collect();

        let split = scores.len() - TREND_RECENT;
        let recent = mean(&scores[split..]);
        let older = if split == 0 { scores[0] } else { mean(&scores[..split]) };

        if recent > older * IMPROVING_RATIO {
            Trend::Improving
        } else if recent < older * DECLINING_RATIO {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    /// Mean score of records within the last `hours`, `None` when there are none.
    pub fn window_mean(&self, hours: u64, now: DateTime<Utc>) -> Option<f64> {
        let cutoff = now - Duration::hours(hours.min(i32::MAX as u64) as i64);
        let scores: Vec<f64> = self
            .records
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .map(|r| r.score)
            .collect();
        (!scores.is_empty()).then(|| mean(&scores))
    }

    /// Mean of the last ten records grouped by their `domain` context key.
    pub fn domain_effectiveness(&self) -> BTreeMap<String, f64> {
        let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in self.records.iter().rev().take(DOMAIN_WINDOW) {
            let domain = record
                .context
                .get("domain")
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            grouped.entry(domain).or_default().push(record.score);
        }
        grouped
            .into_iter()
            .map(|(domain, scores)| (domain, mean(&scores)))
            .collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(scores: &[f64]) -> EffectivenessTracker {
        let mut t = EffectivenessTracker::default();
        for &s in scores {
            t.track(s, Context::new());
        }
        t
    }

    #[test]
    fn improving_after_step_up() {
        let t = tracker_with(&[0.10, 0.12, 0.11, 0.30, 0.32, 0.31]);
        assert_eq!(t.trend(), Trend::Improving);
    }

    #[test]
    fn fewer_than_three_is_insufficient() {
        assert_eq!(tracker_with(&[]).trend(), Trend::InsufficientData);
        assert_eq!(tracker_with(&[0.2, 0.4]).trend(), Trend::InsufficientData);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut t = EffectivenessTracker::new(3);
        for s in [0.1, 0.2, 0.3, 0.4] {
            t.track(s, Context::new());
        }
        assert_eq!(t.len(), 3);
        assert_eq!(t.records().next().map(|r| r.score), Some(0.2));
        assert_eq!(t.current(), Some(0.4));
    }

    #[test]
    fn scores_are_clamped() {
        let t = tracker_with(&[1.7, -0.3, f64::NAN]);
        let scores: Vec<f64> = t.records().map(|r| r.score).collect();
        assert_eq!(scores, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn window_mean_ignores_old_records() {
        let now = Utc::now();
        let mut t = EffectivenessTracker::default();
        t.track_at(0.9, Context::new(), now - Duration::hours(100));
        t.track_at(0.2, Context::new(), now - Duration::hours(10));
        t.track_at(0.4, Context::new(), now);
        assert!((t.window_mean(72, now).unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(EffectivenessTracker::default().window_mean(72, now), None);
    }

    #[test]
    fn domain_effectiveness_groups_recent_records() {
        let mut t = EffectivenessTracker::default();
        // Only the last ten count; this one falls out.
        t.track(1.0, Context::from([("domain".to_string(), "code".to_string())]));
        for i in 0..10 {
            let mut ctx = Context::new();
            if i % 2 == 0 {
                ctx.insert("domain".into(), "code".into());
            }
            t.track(0.2, ctx);
        }
        let by_domain = t.domain_effectiveness();
        assert!((by_domain["code"] - 0.2).abs() < 1e-9);
        assert!((by_domain["unknown"] - 0.2).abs() < 1e-9);
    }
}
