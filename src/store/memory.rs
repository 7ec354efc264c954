use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value as JsonValue};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{merge_fields, Document, DocumentStore};
use crate::error::{Error, Result};

type CollectionKey = (String, String);

/// Process-local document store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<CollectionKey, Vec<Document>>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with `RemoteUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::RemoteUnavailable(
                "memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

fn key(owner: &str, collection: &str) -> CollectionKey {
    (owner.to_string(), collection.to_string())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_all(&self, owner: &str, collection: &str) -> Result<Vec<Document>> {
        self.ensure_online()?;
        let guard = self.collections.read().await;
        Ok(guard
            .get(&key(owner, collection))
            .cloned()
            .unwrap_or_default())
    }

    async fn get(&self, owner: &str, collection: &str, id: Uuid) -> Result<Option<Document>> {
        self.ensure_online()?;
        let guard = self.collections.read().await;
        Ok(guard
            .get(&key(owner, collection))
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn create(&self, owner: &str, collection: &str, data: JsonValue) -> Result<Document> {
        self.ensure_online()?;
        let doc = Document {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            data,
        };
        let mut guard = self.collections.write().await;
        guard
            .entry(key(owner, collection))
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn patch(
        &self,
        owner: &str,
        collection: &str,
        id: Uuid,
        fields: Map<String, JsonValue>,
    ) -> Result<Option<Document>> {
        self.ensure_online()?;
        let mut guard = self.collections.write().await;
        let Some(doc) = guard
            .get_mut(&key(owner, collection))
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        else {
            return Ok(None);
        };
        merge_fields(&mut doc.data, fields);
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, owner: &str, collection: &str, id: Uuid) -> Result<bool> {
        self.ensure_online()?;
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(&key(owner, collection)) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok(docs.len() != before)
    }
}
