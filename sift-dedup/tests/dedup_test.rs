//! Integration tests for sift-dedup: golden classification, threshold and
//! clustering datasets, plus end-to-end planning against the fixture providers.

use std::collections::BTreeMap;

use serde_json::Value;
use sift_core::config::DedupConfig;
use sift_core::models::{Document, Domain, SimilarityPair, ThresholdConfig};
use sift_dedup::{classify, ClusterBuilder, DedupOutcome, DedupPlanner, ThresholdPolicy};
use test_fixtures::{load_fixture_value, padded, JaccardSimilarity, ScriptedSimilarity};

fn document_from(id: &str, content: &str, metadata: &Value) -> Document {
    let mut doc = Document::new(id, content);
    if let Some(map) = metadata.as_object() {
        for (k, v) in map {
            doc = doc.with_metadata(k, v.clone());
        }
    }
    doc
}

// ---------------------------------------------------------------------------
// Golden datasets
// ---------------------------------------------------------------------------

#[test]
fn golden_domain_classification() {
    let fixture = load_fixture_value("golden/dedup/domain_classification.json");
    for case in fixture["cases"].as_array().unwrap() {
        let id = case["id"].as_str().unwrap();
        let doc = document_from(id, case["content"].as_str().unwrap(), &case["metadata"]);
        let expected: Domain = case["expected"].as_str().unwrap().parse().unwrap();
        assert_eq!(classify(&doc), expected, "case {id}");
    }
}

#[test]
fn golden_threshold_scenarios() {
    let fixture = load_fixture_value("golden/dedup/threshold_scenarios.json");
    for case in fixture["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let domain_thresholds: BTreeMap<String, f64> =
            serde_json::from_value(case["domain_thresholds"].clone()).unwrap();
        let config = DedupConfig {
            similarity_threshold: case["base_threshold"].as_f64().unwrap(),
            domain_thresholds,
            ..DedupConfig::default()
        };
        let thresholds = ThresholdConfig::from_config(&config).unwrap();
        let policy = ThresholdPolicy::new(thresholds, true);

        let len = case["content_length"].as_u64().unwrap() as usize;
        let doc = document_from(name, &padded("x ", len), &case["metadata"]);
        let decision = policy.decide(&doc, config.similarity_threshold);

        let expected = case["expected_threshold"].as_f64().unwrap();
        assert!(
            (decision.threshold - expected).abs() < 1e-9,
            "case {name}: got {}, expected {expected}",
            decision.threshold
        );
        assert_eq!(decision.reason, case["expected_reason"].as_str().unwrap(), "case {name}");
    }
}

#[test]
fn golden_cluster_scenarios() {
    let fixture = load_fixture_value("golden/dedup/cluster_scenarios.json");
    for case in fixture["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let pairs: Vec<SimilarityPair> = case["pairs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| {
                SimilarityPair::new(
                    p[0].as_str().unwrap(),
                    p[1].as_str().unwrap(),
                    p[2].as_f64().unwrap(),
                )
            })
            .collect();
        let builder = ClusterBuilder::new(
            case["min_size"].as_u64().unwrap() as usize,
            case["max_clusters"].as_u64().unwrap() as usize,
        );
        let outcome = builder.build(&pairs);

        let actual: Vec<Vec<String>> = outcome
            .clusters()
            .iter()
            .map(|c| {
                let mut members: Vec<String> = c.members.iter().map(|m| m.to_string()).collect();
                members.sort();
                members
            })
            .collect();
        let expected: Vec<Vec<String>> = serde_json::from_value(case["expected"].clone()).unwrap();
        assert_eq!(actual, expected, "case {name}");
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[test]
fn jaccard_plan_removes_exact_copies_only() {
    let documents = vec![
        Document::new("a", "the deploy runbook for staging clusters"),
        Document::new("b", "the deploy runbook for staging clusters"),
        Document::new("c", "lunch menu for friday"),
    ];
    let planner = DedupPlanner::new(ThresholdPolicy::new(ThresholdConfig::default(), true), true);
    let outcome = planner.plan(&documents, &JaccardSimilarity, 0.95).unwrap();
    let DedupOutcome::Planned(plan) = outcome else {
        panic!("expected a plan, got {outcome:?}");
    };
    assert_eq!(plan.decisions.len(), 1);
    assert_eq!(plan.decisions[0].keeper.as_str(), "a");
    assert_eq!(plan.decisions[0].duplicates[0].as_str(), "b");
}

#[test]
fn provider_is_queried_at_the_lowest_document_threshold() {
    let documents = vec![
        Document::new("a", padded("x ", 500)).with_metadata("domain", "documentation"),
        Document::new("b", padded("x ", 500)).with_metadata("domain", "text"),
    ];
    let provider = ScriptedSimilarity::from_triples(&[("a", "b", 0.9)]);
    let planner = DedupPlanner::new(ThresholdPolicy::new(ThresholdConfig::default(), true), true);
    let outcome = planner.plan(&documents, &provider, 0.95).unwrap();
    assert_eq!(provider.queried_thresholds(), vec![0.80]);
    // 0.9 clears documentation's 0.80, the lower of the pair's thresholds.
    let DedupOutcome::Planned(plan) = outcome else {
        panic!("expected a plan, got {outcome:?}");
    };
    assert_eq!(plan.pairs_accepted, 1);
    assert_eq!(plan.duplicates_found(), 1);
}

#[test]
fn outcome_serializes_with_status_tag() {
    let outcome = DedupOutcome::NoData { documents_scanned: 3 };
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "no_data");
    assert_eq!(json["documents_scanned"], 3);
}
