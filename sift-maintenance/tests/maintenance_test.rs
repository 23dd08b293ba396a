//! End-to-end maintenance passes against the in-memory store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use sift_core::config::SiftConfig;
use sift_core::errors::{ConfigError, SiftError, StoreError};
use sift_core::models::{CleanupPhase, DeleteReport, Document, DocumentId};
use sift_core::traits::{IMaintenanceHook, IVectorStore};
use sift_dedup::DedupOutcome;
use sift_maintenance::{CleanupScheduler, InsightKind, MaintenanceEngine};
use sift_observability::RecoveryStatus;
use test_fixtures::{code_doc, load_fixture_value, padded, text_docs, InMemoryStore, RecordingHook, ScriptedSimilarity};

fn store() -> Arc<InMemoryStore> {
    Arc::new(
        InMemoryStore::new()
            .with_collection("short_term", text_docs("s", 6))
            .with_collection("long_term", text_docs("l", 4)),
    )
}

fn duplicates() -> Arc<ScriptedSimilarity> {
    Arc::new(ScriptedSimilarity::from_triples(&[
        ("s-0", "s-1", 0.99),
        ("s-2", "s-3", 0.97),
        ("l-0", "l-1", 0.98),
    ]))
}

#[test]
fn golden_phase_schedule() {
    let golden = load_fixture_value("golden/maintenance/phase_schedule.json");
    let now = Utc::now();
    for case in golden["cases"].as_array().unwrap() {
        let phase: CleanupPhase = serde_json::from_value(case["phase"].clone()).unwrap();
        let hours = case["hours_since_last_run"].as_i64().unwrap();
        let mut scheduler = CleanupScheduler::new(&SiftConfig::default().cleanup, now);
        scheduler.restore_last_run(phase, now - Duration::hours(hours));
        assert_eq!(
            scheduler.is_due_at(phase, now),
            case["expected_due"].as_bool().unwrap(),
            "{phase} after {hours}h"
        );
    }
}

#[test]
fn daily_failure_does_not_stop_later_phases() {
    let now = Utc::now();
    let store = store();
    store.insert("scratch", text_docs("x", 2));
    store.fail_collection("scratch");
    let toml = "[cleanup.daily]\ncollections = [\"scratch\"]\n";
    let mut engine = MaintenanceEngine::from_toml_at(toml, store.clone(), duplicates(), now);
    assert!(engine.config_warnings().is_empty());

    let later = now + Duration::hours(3);
    let run = engine.run_due_phases_at(later).unwrap();

    assert_eq!(run.phases.len(), 3);
    assert_eq!(run.failed_phases(), vec![CleanupPhase::Daily]);
    let daily = run.report(CleanupPhase::Daily).unwrap();
    assert_eq!(daily.errors[0].collection.as_deref(), Some("scratch"));
    assert!(daily.errors[0].message.contains("unavailable"));
    assert!(run.report(CleanupPhase::Weekly).unwrap().succeeded());
    assert_eq!(run.documents_removed, 3);

    let status = engine.status_at(later);
    assert!(status[0].is_due);
    assert!(!status[1].is_due);
    assert!(!status[2].is_due);
    assert_eq!(engine.failures().active_failures().len(), 1);

    store.heal_collection("scratch");
    let retry = engine.run_due_phases_at(later + Duration::minutes(5)).unwrap();
    assert_eq!(retry.phases.len(), 1);
    assert!(retry.failed_phases().is_empty());
    let failure = engine.failures().last_failure(CleanupPhase::Daily).unwrap();
    assert_eq!(failure.recovery_status, RecoveryStatus::Recovered);
}

#[test]
fn daily_count_failure_fails_the_phase_but_busiest_collection_is_cleaned() {
    let now = Utc::now();
    let store = store();
    store.fail_collection("long_term");
    let toml = "[cleanup.daily]\ncollections = [\"short_term\", \"long_term\"]\n";
    let mut engine = MaintenanceEngine::from_toml_at(toml, store.clone(), duplicates(), now);
    let last_run_before = engine.status_at(now)[0].last_run;

    let report = engine.run_phase_at(CleanupPhase::Daily, now).unwrap();

    assert!(!report.succeeded());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].collection.as_deref(), Some("long_term"));
    assert_eq!(report.collections.len(), 1);
    assert_eq!(report.collections[0].collection, "short_term");
    assert_eq!(report.documents_removed, 2);
    assert_eq!(store.ids("short_term").len(), 4);
    assert_eq!(engine.failures().active_failures().len(), 1);
    assert_eq!(engine.status_at(now)[0].last_run, last_run_before);
}

#[test]
fn weekly_reports_per_collection_counts() {
    let now = Utc::now();
    let store = store();
    let mut engine = MaintenanceEngine::new_at(SiftConfig::default(), store.clone(), duplicates(), now);

    let report = engine.run_phase_at(CleanupPhase::Weekly, now).unwrap();

    assert!(report.succeeded());
    assert_eq!(report.documents_processed, 10);
    assert_eq!(report.documents_removed, 3);
    assert_eq!(report.collections.len(), 2);
    assert_eq!(report.message, "processed 10 documents, removed 3 similar items");
    assert_eq!(store.ids("short_term").len(), 4);
    assert_eq!(store.ids("long_term").len(), 3);
    assert_eq!(engine.stats().passes, 2);
}

#[test]
fn locked_duplicate_is_reported_pending() {
    let now = Utc::now();
    let store = store();
    store.lock_document("s-1");
    let mut engine = MaintenanceEngine::new_at(SiftConfig::default(), store.clone(), duplicates(), now);

    let report = engine.run_phase_at(CleanupPhase::Daily, now).unwrap();

    assert!(report.succeeded());
    assert_eq!(report.documents_removed, 1);
    assert_eq!(report.documents_pending, 1);
    assert!(store.ids("short_term").contains(&"s-1".to_string()));
}

/// Loses one document between the snapshot and the delete.
struct VanishingStore {
    inner: InMemoryStore,
    vanish: String,
}

impl IVectorStore for VanishingStore {
    fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let snapshot = self.inner.list(collection)?;
        self.inner.remove_externally(collection, &self.vanish);
        Ok(snapshot)
    }

    fn delete(&self, collection: &str, ids: &[DocumentId]) -> Result<DeleteReport, StoreError> {
        self.inner.delete(collection, ids)
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        self.inner.count(collection)
    }
}

#[test]
fn deleting_an_already_absent_document_succeeds() {
    let now = Utc::now();
    let store = Arc::new(VanishingStore {
        inner: InMemoryStore::new().with_collection("short_term", text_docs("s", 4)),
        vanish: "s-1".into(),
    });
    let mut engine = MaintenanceEngine::new_at(SiftConfig::default(), store.clone(), duplicates(), now);

    let report = engine.run_phase_at(CleanupPhase::Daily, now).unwrap();

    assert!(report.succeeded());
    assert_eq!(report.documents_removed, 2);
    assert_eq!(report.documents_pending, 0);
    assert_eq!(store.inner.ids("short_term"), vec!["s-0".to_string(), "s-2".to_string()]);
}

#[test]
fn exhausted_budget_stops_deletes_but_not_the_phase() {
    let now = Utc::now();
    let store = store();
    store.set_list_delay(StdDuration::from_millis(1100));
    let toml = "[cleanup.daily]\nmax_processing_time_seconds = 1\n";
    let mut engine = MaintenanceEngine::from_toml_at(toml, store.clone(), duplicates(), now);

    let report = engine.run_phase_at(CleanupPhase::Daily, now).unwrap();

    assert!(report.succeeded());
    assert!(report.budget_exhausted);
    assert_eq!(report.documents_processed, 6);
    assert_eq!(report.documents_removed, 0);
    assert_eq!(report.collections[0].skipped_clusters, 2);
    assert_eq!(store.delete_calls(), 0);
    assert!(!engine.status_at(now).iter().any(|s| s.is_due));
}

#[test]
fn invalid_sections_fall_back_with_warnings() {
    let now = Utc::now();
    let toml = "[dedup]\nsimilarity_threshold = 1.5\n\n[optimization]\nadjustment_step = 0.02\n";
    let engine = MaintenanceEngine::from_toml_at(toml, store(), duplicates(), now);

    assert_eq!(engine.config_warnings().len(), 1);
    assert!(matches!(
        engine.config_warnings()[0],
        ConfigError::ThresholdOutOfBounds { .. }
    ));
    assert_eq!(engine.thresholds().base_threshold(), 0.95);

    let broken = MaintenanceEngine::from_toml_at("[dedup\n", store(), duplicates(), now);
    assert!(matches!(
        broken.config_warnings()[0],
        ConfigError::ParseFailed { .. }
    ));
    assert_eq!(broken.config().cleanup.daily.interval_hours, 24);
}

#[test]
fn long_important_code_uses_tightened_domain_threshold() {
    let now = Utc::now();
    let body = padded("x ", 2500);
    let docs = vec![
        code_doc("c-0", &body).with_metadata("importance_score", 0.9),
        code_doc("c-1", &body).with_metadata("importance_score", 0.9),
        code_doc("c-2", &body).with_metadata("importance_score", 0.9),
    ];
    let store = Arc::new(InMemoryStore::new().with_collection("short_term", docs));
    let provider = Arc::new(ScriptedSimilarity::from_triples(&[
        ("c-0", "c-1", 0.87),
        ("c-1", "c-2", 0.855),
    ]));
    let toml = "[dedup]\ndomain_thresholds = { code = 0.85 }\n";
    let engine = MaintenanceEngine::from_toml_at(toml, store, provider.clone(), now);

    let DedupOutcome::Planned(plan) = engine.preview_duplicates("short_term").unwrap() else {
        panic!("expected a plan");
    };
    assert!((plan.query_threshold - 0.86).abs() < 1e-9);
    assert_eq!(plan.pairs_accepted, 1);
    assert_eq!(plan.decisions[0].keeper.as_str(), "c-0");
    assert_eq!(plan.decisions[0].duplicates[0].as_str(), "c-1");

    let analysis = engine.domain_analysis("short_term").unwrap();
    assert_eq!(analysis.total_documents, 3);
}

/// Captures whether the engine's running flag was set while it ran.
struct ObservingHook {
    flag: Arc<AtomicBool>,
    seen: Mutex<Option<bool>>,
}

impl IMaintenanceHook for ObservingHook {
    fn run(&self) -> Result<usize, SiftError> {
        *self.seen.lock().unwrap() = Some(self.flag.load(Ordering::SeqCst));
        Ok(0)
    }

    fn name(&self) -> &str {
        "observing"
    }
}

#[test]
fn monthly_runs_hook_and_flags_insights() {
    let now = Utc::now();
    let store = Arc::new(
        InMemoryStore::new()
            .with_collection("short_term", text_docs("s", 30))
            .with_collection("long_term", text_docs("l", 5)),
    );
    let hook = Arc::new(RecordingHook::new(7));
    let mut engine =
        MaintenanceEngine::new_at(SiftConfig::default(), store, duplicates(), now).with_hook(hook.clone());

    let report = engine.run_phase_at(CleanupPhase::Monthly, now).unwrap();

    assert!(report.succeeded());
    assert_eq!(hook.calls(), 1);
    assert_eq!(report.hook.as_ref().map(|h| h.documents_touched), Some(7));
    let kinds: Vec<InsightKind> = report.insights.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![InsightKind::CollectionImbalance, InsightKind::LowEffectiveness]
    );
}

#[test]
fn monthly_skips_hook_once_dedup_spends_the_budget() {
    let now = Utc::now();
    let store = store();
    store.set_list_delay(StdDuration::from_millis(1100));
    let hook = Arc::new(RecordingHook::new(7));
    let toml = "[cleanup.monthly]\nmax_processing_time_seconds = 1\n";
    let mut engine = MaintenanceEngine::from_toml_at(toml, store.clone(), duplicates(), now).with_hook(hook.clone());

    let report = engine.run_phase_at(CleanupPhase::Monthly, now).unwrap();

    assert!(report.succeeded());
    assert!(report.budget_exhausted);
    assert_eq!(hook.calls(), 0);
    assert!(report.hook.is_none());
    assert_eq!(report.documents_removed, 0);
    assert_eq!(report.collections.len(), 2);
}

#[test]
fn failing_hook_fails_monthly() {
    let now = Utc::now();
    let mut engine = MaintenanceEngine::new_at(SiftConfig::default(), store(), duplicates(), now)
        .with_hook(Arc::new(RecordingHook::failing()));

    let report = engine.run_phase_at(CleanupPhase::Monthly, now).unwrap();

    assert!(!report.succeeded());
    assert!(report.errors[0].message.contains("tier promotion"));
    assert_eq!(report.documents_removed, 3);
    assert!(engine.status_at(now)[2].last_run < now);
}

#[test]
fn guard_is_held_for_the_whole_phase() {
    let now = Utc::now();
    let engine = MaintenanceEngine::new_at(SiftConfig::default(), store(), duplicates(), now);
    let hook = Arc::new(ObservingHook {
        flag: engine.running_flag(),
        seen: Mutex::new(None),
    });
    let mut engine = engine.with_hook(hook.clone());

    engine.run_phase_at(CleanupPhase::Monthly, now).unwrap();

    assert_eq!(*hook.seen.lock().unwrap(), Some(true));
    assert!(!engine.is_running());
}

#[test]
fn snapshot_survives_restart() {
    let now = Utc::now();
    let mut engine = MaintenanceEngine::new_at(SiftConfig::default(), store(), duplicates(), now);
    engine.run_phase_at(CleanupPhase::Weekly, now).unwrap();
    let json = serde_json::to_string(&engine.scheduler_snapshot()).unwrap();

    let later = now + Duration::hours(5);
    let mut restarted = MaintenanceEngine::new_at(SiftConfig::default(), store(), duplicates(), later);
    restarted.restore_scheduler(&serde_json::from_str(&json).unwrap());

    let status = restarted.status_at(later);
    assert_eq!(status[1].last_run, now);
    assert!(!status[1].is_due);
    assert!(status[0].is_due);
}

#[test]
fn optimizer_lowers_thresholds_on_low_effectiveness() {
    let now = Utc::now();
    let mut engine = MaintenanceEngine::new_at(SiftConfig::default(), store(), duplicates(), now);

    let outcome = engine.optimize_thresholds_at(Some(5.0), now).unwrap();

    assert!(!outcome.adjustments().is_empty());
    assert!((engine.thresholds().base_threshold() - 0.93).abs() < 1e-9);
    let stats = engine.advanced_stats_at(now);
    assert_eq!(stats.optimization_count, 1);
    assert_eq!(stats.next_optimization, Some(now + Duration::hours(168)));
}
