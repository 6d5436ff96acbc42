//! In-process store backend for tests and development.
//!
//! Everything lives under one async mutex: document maps and watch senders
//! together. Mutations compute the fresh snapshot and publish it before the
//! lock is released, so watchers can never observe snapshots out of order.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::document::{Collection, Document, DocumentStore, Snapshot};
use crate::error::StoreError;

type Key = (String, Collection);

#[derive(Default)]
struct Inner {
    /// Documents per (owner, collection), keyed by id. BTreeMap keeps list
    /// order deterministic (id ascending), matching the Postgres backend.
    documents: HashMap<Key, BTreeMap<String, Document>>,
    watchers: HashMap<Key, watch::Sender<Snapshot>>,
}

impl Inner {
    fn snapshot(&self, key: &Key) -> Snapshot {
        self.documents
            .get(key)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Push the current snapshot to watchers of this collection, dropping
    /// the channel once every receiver is gone.
    fn publish(&mut self, key: &Key) {
        let open = match self.watchers.get(key) {
            Some(sender) => !sender.is_closed(),
            None => return,
        };
        if !open {
            self.watchers.remove(key);
            return;
        }
        let snapshot = self.snapshot(key);
        if let Some(sender) = self.watchers.get(key) {
            sender.send_replace(snapshot);
        }
    }
}

/// In-memory [`DocumentStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(
        &self,
        owner: &str,
        collection: Collection,
        data: Value,
    ) -> Result<Document, StoreError> {
        let document = Document {
            id: Uuid::now_v7().to_string(),
            version: 1,
            data,
            updated_at: Utc::now(),
        };

        let key = (owner.to_string(), collection);
        let mut inner = self.inner.lock().await;
        inner
            .documents
            .entry(key.clone())
            .or_default()
            .insert(document.id.clone(), document.clone());
        inner.publish(&key);
        Ok(document)
    }

    async fn put(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<Document, StoreError> {
        let key = (owner.to_string(), collection);
        let mut inner = self.inner.lock().await;
        let docs = inner.documents.entry(key.clone()).or_default();

        let version = docs.get(id).map_or(1, |existing| existing.version + 1);
        let document = Document {
            id: id.to_string(),
            version,
            data,
            updated_at: Utc::now(),
        };
        docs.insert(id.to_string(), document.clone());
        inner.publish(&key);
        Ok(document)
    }

    async fn merge(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> Result<Document, StoreError> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::Validation(
                "Merge patch must be a JSON object".to_string(),
            ));
        };

        let key = (owner.to_string(), collection);
        let mut inner = self.inner.lock().await;
        let docs = inner.documents.entry(key.clone()).or_default();

        let existing = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection.entity_name(), id))?;
        let Value::Object(fields) = &mut existing.data else {
            return Err(StoreError::Validation(
                "Stored document is not a JSON object".to_string(),
            ));
        };

        for (field, value) in patch {
            fields.insert(field, value);
        }
        existing.version += 1;
        existing.updated_at = Utc::now();
        let document = existing.clone();

        inner.publish(&key);
        Ok(document)
    }

    async fn put_if_version(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        expected_version: i64,
        data: Value,
    ) -> Result<Document, StoreError> {
        let key = (owner.to_string(), collection);
        let mut inner = self.inner.lock().await;
        let docs = inner.documents.entry(key.clone()).or_default();

        let existing = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection.entity_name(), id))?;
        if existing.version != expected_version {
            return Err(StoreError::version_conflict(collection.entity_name(), id));
        }

        existing.version += 1;
        existing.data = data;
        existing.updated_at = Utc::now();
        let document = existing.clone();

        inner.publish(&key);
        Ok(document)
    }

    async fn get(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let key = (owner.to_string(), collection);
        let inner = self.inner.lock().await;
        Ok(inner
            .documents
            .get(&key)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(&self, owner: &str, collection: Collection) -> Result<Snapshot, StoreError> {
        let key = (owner.to_string(), collection);
        let inner = self.inner.lock().await;
        Ok(inner.snapshot(&key))
    }

    async fn delete(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
    ) -> Result<bool, StoreError> {
        let key = (owner.to_string(), collection);
        let mut inner = self.inner.lock().await;
        let removed = inner
            .documents
            .get_mut(&key)
            .map_or(false, |docs| docs.remove(id).is_some());
        if removed {
            inner.publish(&key);
        }
        Ok(removed)
    }

    async fn watch(
        &self,
        owner: &str,
        collection: Collection,
    ) -> Result<watch::Receiver<Snapshot>, StoreError> {
        let key = (owner.to_string(), collection);
        let mut inner = self.inner.lock().await;
        if let Some(sender) = inner.watchers.get(&key) {
            // Live senders already hold the current snapshot; closed ones
            // were kept current too, since any mutation would have pruned
            // them in publish().
            return Ok(sender.subscribe());
        }

        let (sender, receiver) = watch::channel(inner.snapshot(&key));
        inner.watchers.insert(key, sender);
        Ok(receiver)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
