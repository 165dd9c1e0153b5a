use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Document, DocumentStore, Query, StoreError};

type Collection = BTreeMap<String, Document>;

/// Process-local document store. Clones share the same data and the same
/// open/closed state.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    project_id: Arc<str>,
    collections: Arc<RwLock<HashMap<String, Collection>>>,
    open: Arc<AtomicBool>,
}

impl InMemoryDocumentStore {
    pub fn open(project_id: &str) -> Self {
        info!(project_id, "document store opened");
        InMemoryDocumentStore {
            project_id: Arc::from(project_id),
            collections: Arc::new(RwLock::new(HashMap::new())),
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn add(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        let mut id = Self::new_id();
        while docs.contains_key(&id) {
            id = Self::new_id();
        }
        docs.insert(id.clone(), document);
        debug!(collection, id = %id, "document added");
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.ensure_open()?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let stored = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        stored.extend(fields);
        debug!(collection, id, "document updated");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            if docs.remove(id).is_some() {
                debug!(collection, id, "document deleted");
            }
        }
        Ok(())
    }

    async fn query(&self, query: &Query) -> Result<Vec<(String, Document)>, StoreError> {
        self.ensure_open()?;
        let collections = self.collections.read().await;
        Ok(match collections.get(&query.collection) {
            Some(docs) => query.evaluate(docs.iter()),
            None => Vec::new(),
        })
    }

    async fn close(&self) -> Result<(), StoreError> {
        if self.open.swap(false, Ordering::AcqRel) {
            info!(project_id = %self.project_id, "document store closed");
        }
        Ok(())
    }
}
