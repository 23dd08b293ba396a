use std::sync::Arc;

use crate::errors::StoreError;
use crate::models::{DeleteReport, Document, DocumentId};

/// The external vector store that owns every document.
pub trait IVectorStore: Send + Sync {
    /// Point-in-time snapshot of a collection.
    fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Delete ids from a collection. Absent ids are reported as `missing`,
    /// not as failures.
    fn delete(&self, collection: &str, ids: &[DocumentId]) -> Result<DeleteReport, StoreError>;

    fn count(&self, collection: &str) -> Result<usize, StoreError>;
}

/// Blanket impl: `Arc<T>` implements `IVectorStore` by delegating to the inner `T`.
impl<T: IVectorStore + ?Sized> IVectorStore for Arc<T> {
    fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        (**self).list(collection)
    }

    fn delete(&self, collection: &str, ids: &[DocumentId]) -> Result<DeleteReport, StoreError> {
        (**self).delete(collection, ids)
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        (**self).count(collection)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct OneCollection {
        docs: Mutex<Vec<Document>>,
    }

    impl IVectorStore for OneCollection {
        fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
            match collection {
                "notes" => Ok(self.docs.lock().unwrap().clone()),
                other => Err(StoreError::CollectionNotFound { collection: other.into() }),
            }
        }

        fn delete(&self, _collection: &str, ids: &[DocumentId]) -> Result<DeleteReport, StoreError> {
            let mut docs = self.docs.lock().unwrap();
            let mut report = DeleteReport::default();
            for id in ids {
                if let Some(pos) = docs.iter().position(|d| &d.id == id) {
                    docs.remove(pos);
                    report.deleted.push(id.clone());
                } else {
                    report.missing.push(id.clone());
                }
            }
            Ok(report)
        }

        fn count(&self, collection: &str) -> Result<usize, StoreError> {
            self.list(collection).map(|docs| docs.len())
        }
    }

    #[test]
    fn arc_store_delegates_to_the_shared_inner_store() {
        let inner = Arc::new(OneCollection {
            docs: Mutex::new(vec![Document::new("a", "alpha"), Document::new("b", "beta")]),
        });
        let as_dyn: Arc<dyn IVectorStore> = inner.clone();
        let via_arc: &dyn IVectorStore = &as_dyn;

        let report = via_arc.delete("notes", &[DocumentId::new("a"), DocumentId::new("z")]).unwrap();
        assert_eq!(report.deleted, vec![DocumentId::new("a")]);
        assert_eq!(report.missing, vec![DocumentId::new("z")]);

        assert_eq!(via_arc.count("notes").unwrap(), 1);
        assert_eq!(inner.count("notes").unwrap(), 1);
        assert!(matches!(via_arc.list("missing"), Err(StoreError::CollectionNotFound { .. })));
    }
}
