//! Error taxonomy for store operations.

/// Errors surfaced by the document store and the typed stores built on it.
///
/// `Validation` is raised before anything reaches a backend; everything else
/// reports what the backend did. Backend failures are surfaced verbatim and
/// never retried or queued.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The input failed domain validation; no backend call was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The named thing does not exist in the owner's scope.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A versioned overwrite observed a newer version than expected.
    #[error("Version conflict writing {entity} {id}")]
    VersionConflict { entity: &'static str, id: String },

    /// A stored document did not match the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend reported a failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn version_conflict(entity: &'static str, id: impl Into<String>) -> Self {
        Self::VersionConflict {
            entity,
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.to_string())
    }
}
