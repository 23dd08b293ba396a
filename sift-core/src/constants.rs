/// sift version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lowest similarity threshold any policy or optimizer may produce.
pub const MIN_THRESHOLD: f64 = 0.5;

/// Highest similarity threshold any policy or optimizer may produce.
pub const MAX_THRESHOLD: f64 = 0.99;

/// Effectiveness records retained by the tracker.
pub const MAX_EFFECTIVENESS_RECORDS: usize = 100;

/// Optimization records retained by the optimizer.
pub const MAX_OPTIMIZATION_RECORDS: usize = 10;

/// Phase failures retained for operator diagnostics.
pub const MAX_TRACKED_FAILURES: usize = 200;

/// Languages whose `language` metadata marks a document as code.
pub const CODE_LANGUAGES: &[&str] = &["python", "javascript", "java", "c++", "c", "go", "rust"];
