//! Route definitions for the `/timeline` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::timeline;
use crate::state::AppState;

/// Routes mounted at `/timeline`.
///
/// ```text
/// GET  /                     -> list_years
/// POST /{year}/questions     -> generate_questions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(timeline::list_years))
        .route("/{year}/questions", post(timeline::generate_questions))
}
