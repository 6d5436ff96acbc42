//! Typed store for community photo requests.
//!
//! Responses are simulated: there is no community backend, so a "response"
//! is a local transition to `found`. Whether that transition is written back
//! to the store is configurable; the unpersisted mode mirrors the demo
//! behavior where a response only lives until the next reload.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use memoir_core::photo_request::{self, PhotoRequest, PhotoRequestDraft, PhotoRequestStatus};

use crate::document::{Collection, Document, DocumentStore, Snapshot};
use crate::error::StoreError;

/// Photo request operations over a [`DocumentStore`] backend.
#[derive(Clone)]
pub struct PhotoRequestStore {
    store: Arc<dyn DocumentStore>,
    persist_responses: bool,
}

impl PhotoRequestStore {
    pub fn new(store: Arc<dyn DocumentStore>, persist_responses: bool) -> Self {
        Self {
            store,
            persist_responses,
        }
    }

    /// Validate and persist a new request, `pending` with zero responses.
    pub async fn submit(
        &self,
        owner: &str,
        draft: PhotoRequestDraft,
    ) -> Result<PhotoRequest, StoreError> {
        photo_request::validate_request(&draft).map_err(StoreError::Validation)?;

        let request = PhotoRequest {
            id: String::new(),
            location: draft.location.trim().to_string(),
            timeframe: draft.timeframe.trim().to_string(),
            description: draft.description.trim().to_string(),
            status: PhotoRequestStatus::Pending,
            responses: 0,
            requested_at: Utc::now(),
        };

        let data = serde_json::to_value(&request)?;
        let document = self
            .store
            .create(owner, Collection::PhotoRequests, data)
            .await?;
        let request = request_from_document(document)?;

        tracing::info!(owner = %owner, request_id = %request.id, "photo request submitted");
        Ok(request)
    }

    /// Apply one simulated community response: `found`, responses+1.
    ///
    /// When response persistence is off, the transition is returned but the
    /// stored document is left untouched.
    pub async fn simulate_response(
        &self,
        owner: &str,
        id: &str,
    ) -> Result<PhotoRequest, StoreError> {
        let document = self
            .store
            .get(owner, Collection::PhotoRequests, id)
            .await?
            .ok_or_else(|| StoreError::not_found("photo request", id))?;
        let updated = photo_request::apply_response(&request_from_document(document)?);

        let result = if self.persist_responses {
            let data = serde_json::to_value(&updated)?;
            let document = self
                .store
                .put(owner, Collection::PhotoRequests, id, data)
                .await?;
            request_from_document(document)?
        } else {
            updated
        };

        tracing::info!(
            owner = %owner,
            request_id = %id,
            persisted = self.persist_responses,
            "photo response simulated"
        );
        Ok(result)
    }

    /// All requests for an owner, in document order.
    pub async fn list(&self, owner: &str) -> Result<Vec<PhotoRequest>, StoreError> {
        let snapshot = self.store.list(owner, Collection::PhotoRequests).await?;
        snapshot.into_iter().map(request_from_document).collect()
    }

    /// Live subscription to the owner's requests.
    pub async fn subscribe(&self, owner: &str) -> Result<watch::Receiver<Snapshot>, StoreError> {
        self.store.watch(owner, Collection::PhotoRequests).await
    }
}

/// Decode a stored document into a [`PhotoRequest`]; the document id wins.
pub fn request_from_document(document: Document) -> Result<PhotoRequest, StoreError> {
    let mut request: PhotoRequest = serde_json::from_value(document.data)?;
    request.id = document.id;
    Ok(request)
}

/// Decode a watch snapshot, skipping documents that no longer parse.
pub fn requests_from_snapshot(snapshot: &Snapshot) -> Vec<PhotoRequest> {
    snapshot
        .iter()
        .filter_map(|document| match request_from_document(document.clone()) {
            Ok(request) => Some(request),
            Err(err) => {
                tracing::warn!(document_id = %document.id, error = %err, "skipping malformed photo request document");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
