mod hook;
mod similarity;
mod store;

pub use hook::IMaintenanceHook;
pub use similarity::ISimilarityProvider;
pub use store::IVectorStore;
