// Single source of truth for all default values.

// --- Dedup ---
pub const DEFAULT_DEDUP_ENABLED: bool = true;
pub const DEFAULT_BASE_THRESHOLD: f64 = 0.95;
pub const DEFAULT_DOMAIN_AWARE_THRESHOLDS: bool = true;
pub const DEFAULT_CODE_THRESHOLD: f64 = 0.85;
pub const DEFAULT_TEXT_THRESHOLD: f64 = 0.95;
pub const DEFAULT_DATA_THRESHOLD: f64 = 0.90;
pub const DEFAULT_DOCUMENTATION_THRESHOLD: f64 = 0.80;

// --- Clustering ---
pub const DEFAULT_CLUSTERING_ENABLED: bool = true;
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.70;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;
pub const DEFAULT_MAX_CLUSTERS: usize = 50;
pub const DEFAULT_CLUSTER_REFRESH_HOURS: u64 = 24;

// --- Optimization ---
pub const DEFAULT_OPTIMIZATION_ENABLED: bool = true;
pub const DEFAULT_OPTIMIZATION_INTERVAL_HOURS: u64 = 168; // weekly
pub const DEFAULT_PERFORMANCE_WINDOW_HOURS: u64 = 72;
pub const DEFAULT_EFFECTIVENESS_TARGET: f64 = 0.25;
pub const DEFAULT_ADJUSTMENT_STEP: f64 = 0.02;

// --- Cleanup phases ---
pub const DEFAULT_STARTUP_GRACE_HOURS: u64 = 2;

pub const DEFAULT_DAILY_INTERVAL_HOURS: u64 = 24;
pub const DEFAULT_DAILY_MAX_SECS: u64 = 30;
pub const DEFAULT_DAILY_THRESHOLD: f64 = 0.95;
pub const DEFAULT_DAILY_COLLECTIONS: &[&str] = &["short_term"];

pub const DEFAULT_WEEKLY_INTERVAL_HOURS: u64 = 168;
pub const DEFAULT_WEEKLY_MAX_SECS: u64 = 300;
pub const DEFAULT_WEEKLY_THRESHOLD: f64 = 0.75;
pub const DEFAULT_WEEKLY_COLLECTIONS: &[&str] = &["short_term", "long_term"];

pub const DEFAULT_MONTHLY_INTERVAL_HOURS: u64 = 720; // 30 days
pub const DEFAULT_MONTHLY_MAX_SECS: u64 = 1800;
pub const DEFAULT_MONTHLY_THRESHOLD: f64 = 0.65;
pub const DEFAULT_MONTHLY_COLLECTIONS: &[&str] = &["short_term", "long_term"];

// --- Insights ---
pub const DEFAULT_IMBALANCE_RATIO: f64 = 2.0;
pub const DEFAULT_LOW_EFFECTIVENESS_PERCENT: f64 = 10.0;
pub const DEFAULT_LARGE_VOLUME_THRESHOLD: usize = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
