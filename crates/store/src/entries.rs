//! Typed store for journal entries.
//!
//! Wraps the document store with the entry contract: validation before any
//! backend call, tag normalization, server timestamps, and compare-and-swap
//! for the comment read-modify-write paths so two sessions of the same owner
//! cannot lose an append or a like.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use memoir_core::entry::{self, Entry, EntryDraft, EntryKind};
use memoir_core::search;

use crate::document::{Collection, Document, DocumentStore, Snapshot};
use crate::error::StoreError;
use crate::id::TickIdFactory;

/// Attempts per comment mutation before giving up on a version conflict.
/// One owner rarely races against more than one of their own sessions.
const MAX_CAS_RETRIES: u32 = 3;

/// Entry operations over a [`DocumentStore`] backend.
#[derive(Clone)]
pub struct EntryStore {
    store: Arc<dyn DocumentStore>,
    ids: Arc<TickIdFactory>,
}

impl EntryStore {
    pub fn new(store: Arc<dyn DocumentStore>, ids: Arc<TickIdFactory>) -> Self {
        Self { store, ids }
    }

    /// Validate and persist a draft.
    ///
    /// With `existing_id` the identified document is fully overwritten,
    /// except that its comments ride along (the edit form does not carry
    /// them). Without it a new document is created with a store-assigned
    /// id. Validation failures never reach the backend.
    pub async fn save(
        &self,
        owner: &str,
        author_name: &str,
        draft: EntryDraft,
        existing_id: Option<&str>,
    ) -> Result<Entry, StoreError> {
        entry::validate_draft(&draft).map_err(StoreError::Validation)?;

        let author_name = author_name.trim();
        let entry = Entry {
            id: existing_id.unwrap_or_default().to_string(),
            title: draft.title,
            content: draft.content,
            date: draft.date,
            location: draft.location,
            tags: entry::normalize_tags(&draft.tags),
            privacy: draft.privacy,
            kind: draft.kind,
            media_urls: draft.media_urls,
            comments: Vec::new(),
            author: owner.to_string(),
            author_name: if author_name.is_empty() {
                entry::DEFAULT_AUTHOR_NAME.to_string()
            } else {
                author_name.to_string()
            },
            updated_at: Utc::now(),
        };

        let document = match existing_id {
            Some(id) => {
                let current = self
                    .store
                    .get(owner, Collection::Entries, id)
                    .await?
                    .ok_or_else(|| StoreError::not_found("entry", id))?;
                let entry = Entry {
                    comments: entry_from_document(current)?.comments,
                    ..entry
                };
                let data = serde_json::to_value(&entry)?;
                self.store.put(owner, Collection::Entries, id, data).await?
            }
            None => {
                let data = serde_json::to_value(&entry)?;
                self.store.create(owner, Collection::Entries, data).await?
            }
        };

        let entry = entry_from_document(document)?;
        tracing::info!(owner = %owner, entry_id = %entry.id, "entry saved");
        Ok(entry)
    }

    pub async fn get(&self, owner: &str, id: &str) -> Result<Option<Entry>, StoreError> {
        match self.store.get(owner, Collection::Entries, id).await? {
            Some(document) => Ok(Some(entry_from_document(document)?)),
            None => Ok(None),
        }
    }

    /// All entries for an owner, in document order.
    pub async fn list(&self, owner: &str) -> Result<Vec<Entry>, StoreError> {
        let snapshot = self.store.list(owner, Collection::Entries).await?;
        snapshot.into_iter().map(entry_from_document).collect()
    }

    /// Entries matching a free-text query and optional kind, sorted by date
    /// descending. An empty query with no kind returns the full sorted list.
    pub async fn filtered(
        &self,
        owner: &str,
        query: &str,
        kind: Option<EntryKind>,
    ) -> Result<Vec<Entry>, StoreError> {
        let entries = self.list(owner).await?;
        Ok(search::filter_entries(&entries, query, kind))
    }

    /// Irreversibly remove an entry.
    pub async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError> {
        if !self.store.delete(owner, Collection::Entries, id).await? {
            return Err(StoreError::not_found("entry", id));
        }
        tracing::info!(owner = %owner, entry_id = %id, "entry deleted");
        Ok(())
    }

    /// Live subscription to the owner's entries. Dropping the receiver
    /// unsubscribes; decode snapshots with [`entries_from_snapshot`].
    pub async fn subscribe(&self, owner: &str) -> Result<watch::Receiver<Snapshot>, StoreError> {
        self.store.watch(owner, Collection::Entries).await
    }

    /// Append a comment to an entry.
    ///
    /// Read-modify-write under compare-and-swap: a concurrent append from
    /// another session bumps the document version, this call re-reads and
    /// retries, and both comments survive.
    pub async fn add_comment(
        &self,
        owner: &str,
        entry_id: &str,
        author: &str,
        content: &str,
    ) -> Result<Entry, StoreError> {
        entry::validate_comment_content(content).map_err(StoreError::Validation)?;

        let mut attempt = 0;
        loop {
            let document = self
                .store
                .get(owner, Collection::Entries, entry_id)
                .await?
                .ok_or_else(|| StoreError::not_found("entry", entry_id))?;
            let version = document.version;

            let mut entry = entry_from_document(document)?;
            entry
                .comments
                .push(entry::new_comment(self.ids.next_id(), author, content, Utc::now()));

            let data = serde_json::to_value(&entry)?;
            match self
                .store
                .put_if_version(owner, Collection::Entries, entry_id, version, data)
                .await
            {
                Ok(document) => {
                    tracing::info!(owner = %owner, entry_id = %entry_id, "comment added");
                    return entry_from_document(document);
                }
                Err(StoreError::VersionConflict { .. }) if attempt + 1 < MAX_CAS_RETRIES => {
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Increment one comment's likes by exactly one, leaving every other
    /// comment untouched. Same compare-and-swap discipline as
    /// [`EntryStore::add_comment`].
    pub async fn like_comment(
        &self,
        owner: &str,
        entry_id: &str,
        comment_id: &str,
    ) -> Result<Entry, StoreError> {
        let mut attempt = 0;
        loop {
            let document = self
                .store
                .get(owner, Collection::Entries, entry_id)
                .await?
                .ok_or_else(|| StoreError::not_found("entry", entry_id))?;
            let version = document.version;

            let mut entry = entry_from_document(document)?;
            entry.comments = entry::like_comment(&entry.comments, comment_id)
                .ok_or_else(|| StoreError::not_found("comment", comment_id))?;

            let data = serde_json::to_value(&entry)?;
            match self
                .store
                .put_if_version(owner, Collection::Entries, entry_id, version, data)
                .await
            {
                Ok(document) => {
                    tracing::info!(
                        owner = %owner,
                        entry_id = %entry_id,
                        comment_id = %comment_id,
                        "comment liked"
                    );
                    return entry_from_document(document);
                }
                Err(StoreError::VersionConflict { .. }) if attempt + 1 < MAX_CAS_RETRIES => {
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Decode a stored document into an [`Entry`]. The document id is canonical
/// and overwrites whatever id the payload carried.
pub fn entry_from_document(document: Document) -> Result<Entry, StoreError> {
    let mut entry: Entry = serde_json::from_value(document.data)?;
    entry.id = document.id;
    Ok(entry)
}

/// Decode a watch snapshot, skipping documents that no longer parse.
pub fn entries_from_snapshot(snapshot: &Snapshot) -> Vec<Entry> {
    snapshot
        .iter()
        .filter_map(|document| match entry_from_document(document.clone()) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(document_id = %document.id, error = %err, "skipping malformed entry document");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
