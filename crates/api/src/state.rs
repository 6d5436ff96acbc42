use std::sync::Arc;

use memoir_store::{
    DocumentStore, EntryStore, PhotoRequestStore, QuestionStore, TickIdFactory, TimelineStore,
};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (read by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// The raw document store, for watch subscriptions and health probes.
    pub store: Arc<dyn DocumentStore>,
    /// Typed store for journal entries and their comments.
    pub entries: EntryStore,
    /// Typed read surface over timeline events.
    pub timeline: TimelineStore,
    /// Typed store for reflective questions.
    pub questions: QuestionStore,
    /// Typed store for photo requests.
    pub photo_requests: PhotoRequestStore,
}

impl AppState {
    /// Wire the typed stores over one document store.
    ///
    /// Entry comments and generated questions share one [`TickIdFactory`] so
    /// ids minted in the same process never collide.
    pub fn new(config: Arc<ServerConfig>, store: Arc<dyn DocumentStore>) -> Self {
        let ids = Arc::new(TickIdFactory::new());
        let entries = EntryStore::new(store.clone(), ids.clone());
        let timeline = TimelineStore::new(store.clone());
        let questions = QuestionStore::new(store.clone(), ids);
        let photo_requests =
            PhotoRequestStore::new(store.clone(), config.persist_photo_responses);

        Self {
            config,
            store,
            entries,
            timeline,
            questions,
            photo_requests,
        }
    }
}
