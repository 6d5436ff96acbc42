//! Typed store for timeline events.
//!
//! Timeline events are seeded externally and read-only on this surface, so
//! there are no mutation methods. The year view applies the pure
//! aggregation from `memoir_core::timeline`.

use std::sync::Arc;

use tokio::sync::watch;

use memoir_core::timeline::{aggregate_timeline, TimelineEvent, TimelineYear};

use crate::document::{Collection, Document, DocumentStore, Snapshot};
use crate::error::StoreError;

/// Timeline reads over a [`DocumentStore`] backend.
#[derive(Clone)]
pub struct TimelineStore {
    store: Arc<dyn DocumentStore>,
}

impl TimelineStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Raw timeline events for an owner, in document order.
    pub async fn list(&self, owner: &str) -> Result<Vec<TimelineEvent>, StoreError> {
        let snapshot = self.store.list(owner, Collection::TimelineEvents).await?;
        snapshot.into_iter().map(event_from_document).collect()
    }

    /// Year buckets sorted newest first, empty years kept and marked.
    pub async fn years(&self, owner: &str) -> Result<Vec<TimelineYear>, StoreError> {
        let events = self.list(owner).await?;
        Ok(aggregate_timeline(&events))
    }

    /// Live subscription to the owner's timeline events.
    pub async fn subscribe(&self, owner: &str) -> Result<watch::Receiver<Snapshot>, StoreError> {
        self.store.watch(owner, Collection::TimelineEvents).await
    }
}

/// Decode a stored document into a [`TimelineEvent`]; the document id wins.
pub fn event_from_document(document: Document) -> Result<TimelineEvent, StoreError> {
    let mut event: TimelineEvent = serde_json::from_value(document.data)?;
    event.id = document.id;
    Ok(event)
}

/// Decode a watch snapshot, skipping documents that no longer parse.
pub fn events_from_snapshot(snapshot: &Snapshot) -> Vec<TimelineEvent> {
    snapshot
        .iter()
        .filter_map(|document| match event_from_document(document.clone()) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::warn!(document_id = %document.id, error = %err, "skipping malformed timeline document");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
