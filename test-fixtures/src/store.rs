//! In-memory `IVectorStore` with failure injection.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use sift_core::errors::StoreError;
use sift_core::models::{DeleteReport, Document, DocumentId};
use sift_core::traits::IVectorStore;

#[derive(Default)]
struct Faults {
    unavailable: BTreeSet<String>,
    locked: BTreeSet<DocumentId>,
    list_delay: Option<Duration>,
}

/// Collections of documents held in memory, in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<BTreeMap<String, Vec<Document>>>,
    faults: Mutex<Faults>,
    delete_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(self, name: &str, docs: Vec<Document>) -> Self {
        self.insert(name, docs);
        self
    }

    pub fn insert(&self, name: &str, docs: Vec<Document>) {
        let mut collections = self.collections.lock().unwrap();
        collections.entry(name.to_string()).or_default().extend(docs);
    }

    /// Remove a document behind the engine's back, as a concurrent writer would.
    pub fn remove_externally(&self, name: &str, id: &str) {
        let mut collections = self.collections.lock().unwrap();
        if let Some(docs) = collections.get_mut(name) {
            docs.retain(|d| d.id.as_str() != id);
        }
    }

    /// Make every operation on `name` fail with `StoreError::Unavailable`.
    pub fn fail_collection(&self, name: &str) {
        self.faults.lock().unwrap().unavailable.insert(name.to_string());
    }

    pub fn heal_collection(&self, name: &str) {
        self.faults.lock().unwrap().unavailable.remove(name);
    }

    /// Deleting `id` reports a per-id failure instead of removing it.
    pub fn lock_document(&self, id: &str) {
        self.faults.lock().unwrap().locked.insert(DocumentId::from(id));
    }

    /// Every `list` call sleeps this long before returning.
    pub fn set_list_delay(&self, delay: Duration) {
        self.faults.lock().unwrap().list_delay = Some(delay);
    }

    pub fn ids(&self, name: &str) -> Vec<String> {
        let collections = self.collections.lock().unwrap();
        collections
            .get(name)
            .map(|docs| docs.iter().map(|d| d.id.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self, name: &str) -> Result<(), StoreError> {
        if self.faults.lock().unwrap().unavailable.contains(name) {
            return Err(StoreError::Unavailable {
                reason: format!("collection {name} offline"),
            });
        }
        Ok(())
    }
}

impl IVectorStore for InMemoryStore {
    fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.check_available(collection)?;
        let delay = self.faults.lock().unwrap().list_delay;
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        let collections = self.collections.lock().unwrap();
        collections
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::CollectionNotFound {
                collection: collection.to_string(),
            })
    }

    fn delete(&self, collection: &str, ids: &[DocumentId]) -> Result<DeleteReport, StoreError> {
        self.check_available(collection)?;
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let locked = self.faults.lock().unwrap().locked.clone();
        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        let mut report = DeleteReport::default();
        for id in ids {
            if locked.contains(id) {
                report.failed.push((id.clone(), "document locked".to_string()));
                continue;
            }
            match docs.iter().position(|d| &d.id == id) {
                Some(pos) => {
                    docs.remove(pos);
                    report.deleted.push(id.clone());
                }
                None => report.missing.push(id.clone()),
            }
        }
        Ok(report)
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        self.check_available(collection)?;
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).map_or(0, Vec::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleting_absent_id_reports_missing() {
        let store = InMemoryStore::new().with_collection("c", vec![Document::new("a", "x")]);
        let report = store.delete("c", &["a".into(), "zz".into()]).unwrap();
        assert_eq!(report.deleted, vec![DocumentId::from("a")]);
        assert_eq!(report.missing, vec![DocumentId::from("zz")]);
        assert_eq!(store.count("c").unwrap(), 0);
    }

    #[test]
    fn failed_collection_errors_until_healed() {
        let store = InMemoryStore::new().with_collection("c", vec![]);
        store.fail_collection("c");
        assert!(store.list("c").is_err());
        store.heal_collection("c");
        assert!(store.list("c").is_ok());
    }
}
