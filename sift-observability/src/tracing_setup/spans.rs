//! Span definitions per operation: maintenance phase, dedup pass, optimization.

/// Create a maintenance phase span.
#[macro_export]
macro_rules! maintenance_span {
    ($phase:expr, $run_id:expr) => {
        tracing::info_span!("sift.maintenance", phase = %$phase, run_id = %$run_id)
    };
}

/// Create a dedup pass span.
#[macro_export]
macro_rules! dedup_span {
    ($collection:expr, $documents:expr) => {
        tracing::info_span!("sift.dedup", collection = %$collection, documents = $documents)
    };
}

/// Create an optimization span.
#[macro_export]
macro_rules! optimization_span {
    ($source:expr) => {
        tracing::info_span!("sift.optimization", source = ?$source)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const MAINTENANCE: &str = "sift.maintenance";
    pub const DEDUP: &str = "sift.dedup";
    pub const OPTIMIZATION: &str = "sift.optimization";
}
