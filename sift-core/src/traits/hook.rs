use crate::errors::SiftError;

/// Secondary maintenance run by the monthly phase after deep dedup
/// (e.g. tier promotion or TTL expiry owned by the host).
pub trait IMaintenanceHook: Send + Sync {
    /// Returns the number of documents the hook touched.
    fn run(&self) -> Result<usize, SiftError>;

    fn name(&self) -> &str;
}
