//! The document-store contract: owner-scoped collections of JSON documents.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use memoir_core::types::Timestamp;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// The four owner-scoped collections the journal stores documents in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Entries,
    TimelineEvents,
    AiQuestions,
    PhotoRequests,
}

impl Collection {
    /// All collections, in a fixed order.
    pub const ALL: [Collection; 4] = [
        Collection::Entries,
        Collection::TimelineEvents,
        Collection::AiQuestions,
        Collection::PhotoRequests,
    ];

    /// The stored collection name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entries => "entries",
            Self::TimelineEvents => "timeline_events",
            Self::AiQuestions => "ai_questions",
            Self::PhotoRequests => "photo_requests",
        }
    }

    /// Parse a collection name, e.g. from a URL path segment.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "entries" => Ok(Self::Entries),
            "timeline_events" => Ok(Self::TimelineEvents),
            "ai_questions" => Ok(Self::AiQuestions),
            "photo_requests" => Ok(Self::PhotoRequests),
            _ => Err(format!(
                "Unknown collection '{s}'. Must be one of: entries, timeline_events, ai_questions, photo_requests"
            )),
        }
    }

    /// Singular display name, used in error messages.
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Entries => "entry",
            Self::TimelineEvents => "timeline event",
            Self::AiQuestions => "question",
            Self::PhotoRequests => "photo request",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// One stored document: opaque JSON payload plus store bookkeeping.
///
/// `id` on the document record is canonical; an `id` field inside `data`
/// is best-effort and may lag (a freshly created document carries the id
/// the client knew before the store assigned one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Starts at 1 on first write and moves up by one on every overwrite
    /// or merge. Drives `put_if_version`.
    pub version: i64,
    pub data: Value,
    pub updated_at: Timestamp,
}

/// A full-collection snapshot, re-emitted to watchers after every mutation.
pub type Snapshot = Vec<Document>;

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// The store collaborator contract, modelled on hosted document databases.
///
/// Every operation is scoped to one owner: there is no way to read or write
/// across owners through this interface, which is what makes the `privacy`
/// field on entries a display hint rather than an access control.
///
/// `watch` follows live-subscription-with-snapshot semantics: the receiver
/// always holds the latest full snapshot of the collection, and every
/// successful mutation re-emits it. Dropping the receiver unsubscribes; no
/// callbacks fire after that. Watchers see only changes made through this
/// process's store handle.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-assigned id. Version starts at 1.
    async fn create(
        &self,
        owner: &str,
        collection: Collection,
        data: Value,
    ) -> Result<Document, StoreError>;

    /// Create or fully overwrite the document with this id.
    async fn put(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<Document, StoreError>;

    /// Shallow-merge `patch` into an existing document: top-level fields of
    /// the patch replace or extend the stored object. Both the stored data
    /// and the patch must be JSON objects. Missing document is an error.
    async fn merge(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> Result<Document, StoreError>;

    /// Overwrite only if the stored version still equals `expected_version`;
    /// otherwise fail with a version conflict and leave the document as is.
    async fn put_if_version(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        expected_version: i64,
        data: Value,
    ) -> Result<Document, StoreError>;

    async fn get(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// List the owner's collection, ordered by document id ascending.
    async fn list(&self, owner: &str, collection: Collection) -> Result<Snapshot, StoreError>;

    /// Delete a document. Returns `true` when something was removed.
    async fn delete(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
    ) -> Result<bool, StoreError>;

    /// Subscribe to the owner's collection with the current snapshot seeded.
    async fn watch(
        &self,
        owner: &str,
        collection: Collection,
    ) -> Result<watch::Receiver<Snapshot>, StoreError>;

    /// Cheap reachability probe, for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(
                Collection::from_str_value(collection.as_str()),
                Ok(collection)
            );
        }
    }

    #[test]
    fn unknown_collection_rejected() {
        let result = Collection::from_str_value("albums");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown collection"));
    }

    #[test]
    fn collection_serializes_as_snake_case() {
        let json = serde_json::to_string(&Collection::TimelineEvents).unwrap();
        assert_eq!(json, r#""timeline_events""#);
    }

    #[test]
    fn display_matches_stored_name() {
        assert_eq!(Collection::PhotoRequests.to_string(), "photo_requests");
    }
}
