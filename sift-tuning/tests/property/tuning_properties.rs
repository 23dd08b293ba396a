//! Property tests for sift-tuning.

use proptest::prelude::*;

use sift_core::config::OptimizationConfig;
use sift_core::models::{Domain, ThresholdConfig};
use sift_tuning::effectiveness::Context;
use sift_tuning::optimizer::{DECREASE_BASE_CEILING, INCREASE_BASE_FLOOR};
use sift_tuning::{CumulativeStats, EffectivenessTracker, ThresholdOptimizer, Trend};

proptest! {
    #[test]
    fn repeated_increase_never_below_floor(runs in 1usize..60, step in 0.001f64..=0.25) {
        let mut optimizer = ThresholdOptimizer::new(OptimizationConfig {
            adjustment_step: step,
            ..OptimizationConfig::default()
        });
        let mut thresholds = ThresholdConfig::default();
        let tracker = EffectivenessTracker::default();
        for _ in 0..runs {
            optimizer.optimize(&mut thresholds, &tracker, Some(0.0), CumulativeStats::default());
            prop_assert!(thresholds.base_threshold() >= INCREASE_BASE_FLOOR);
        }
    }

    #[test]
    fn repeated_decrease_never_above_ceiling(runs in 1usize..60, step in 0.001f64..=0.25) {
        let mut optimizer = ThresholdOptimizer::new(OptimizationConfig {
            adjustment_step: step,
            ..OptimizationConfig::default()
        });
        let mut thresholds = ThresholdConfig::default();
        let tracker = EffectivenessTracker::default();
        for _ in 0..runs {
            optimizer.optimize(&mut thresholds, &tracker, Some(1.0), CumulativeStats::default());
            prop_assert!(thresholds.base_threshold() <= DECREASE_BASE_CEILING);
        }
    }

    #[test]
    fn thresholds_stay_clamped_under_any_sequence(
        inputs in prop::collection::vec(0.0f64..=1.0, 1..40),
    ) {
        let mut optimizer = ThresholdOptimizer::new(OptimizationConfig::default());
        let mut thresholds = ThresholdConfig::default();
        let tracker = EffectivenessTracker::default();
        for input in inputs {
            optimizer.optimize(&mut thresholds, &tracker, Some(input), CumulativeStats::default());
            for domain in Domain::ALL {
                let t = thresholds.domain_threshold(domain).unwrap();
                prop_assert!((0.5..=0.99).contains(&t));
            }
        }
    }

    #[test]
    fn tracker_never_exceeds_capacity(scores in prop::collection::vec(-1.0f64..2.0, 0..300)) {
        let mut tracker = EffectivenessTracker::default();
        for s in &scores {
            tracker.track(*s, Context::new());
        }
        prop_assert!(tracker.len() <= 100);
        prop_assert!(tracker.records().all(|r| (0.0..=1.0).contains(&r.score)));
        if scores.len() < 3 {
            prop_assert_eq!(tracker.trend(), Trend::InsufficientData);
        }
    }
}
