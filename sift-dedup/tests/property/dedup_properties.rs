//! Property tests for sift-dedup.

use proptest::prelude::*;

use sift_core::models::{Document, Domain, SimilarityPair, ThresholdConfig};
use sift_dedup::{classify, ClusterBuilder, ThresholdPolicy};

fn arb_document() -> impl Strategy<Value = Document> {
    (
        "[a-zA-Z{}();:#\\[\\] \"]{0,3000}",
        prop::option::of(0.0f64..1.0),
        prop::option::of(0u64..50),
        prop::option::of(prop::sample::select(vec!["code", "text", "data", "documentation", "legal"])),
    )
        .prop_map(|(content, importance, access, domain)| {
            let mut doc = Document::new("d", content);
            if let Some(i) = importance {
                doc = doc.with_metadata("importance_score", i);
            }
            if let Some(a) = access {
                doc = doc.with_metadata("access_count", a);
            }
            if let Some(d) = domain {
                doc = doc.with_metadata("domain", d);
            }
            doc
        })
}

fn arb_pairs() -> impl Strategy<Value = Vec<SimilarityPair>> {
    prop::collection::vec((0u8..30, 0u8..30, 0.0f64..=1.0), 0..80).prop_map(|raw| {
        raw.into_iter()
            .map(|(a, b, s)| SimilarityPair::new(format!("d{a}"), format!("d{b}"), s))
            .collect()
    })
}

fn membership(pairs: &[SimilarityPair]) -> Vec<Vec<String>> {
    let outcome = ClusterBuilder::new(2, usize::MAX).build(pairs);
    let mut sets: Vec<Vec<String>> = outcome
        .clusters()
        .iter()
        .map(|c| {
            let mut m: Vec<String> = c.members.iter().map(|id| id.to_string()).collect();
            m.sort();
            m
        })
        .collect();
    sets.sort();
    sets
}

proptest! {
    #[test]
    fn classification_is_deterministic(doc in arb_document()) {
        let first = classify(&doc);
        prop_assert_eq!(first, classify(&doc));
        prop_assert!(Domain::ALL.contains(&first));
    }

    #[test]
    fn thresholds_stay_in_bounds(doc in arb_document(), base in 0.5f64..=0.99) {
        let policy = ThresholdPolicy::new(ThresholdConfig::default(), true);
        let decision = policy.decide(&doc, base);
        prop_assert!(decision.threshold >= 0.5 && decision.threshold <= 0.99);
        prop_assert!(decision.reason.contains("_adjusted_"));
    }

    #[test]
    fn clustering_is_idempotent(pairs in arb_pairs()) {
        prop_assert_eq!(membership(&pairs), membership(&pairs));
    }

    #[test]
    fn every_clustered_document_appears_once(pairs in arb_pairs()) {
        let sets = membership(&pairs);
        let mut all: Vec<&String> = sets.iter().flatten().collect();
        let total = all.len();
        all.sort();
        all.dedup();
        prop_assert_eq!(all.len(), total);
        for set in &sets {
            prop_assert!(set.len() >= 2);
        }
    }

    #[test]
    fn pair_order_does_not_change_membership(pairs in arb_pairs()) {
        let mut reversed = pairs.clone();
        reversed.reverse();
        prop_assert_eq!(membership(&pairs), membership(&reversed));
    }
}
