//! Route definitions for the `/entries` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::entries;
use crate::state::AppState;

/// Routes mounted at `/entries`.
///
/// ```text
/// GET    /                                  -> list_entries (?q, kind)
/// POST   /                                  -> create_entry
/// GET    /{id}                              -> get_entry
/// PUT    /{id}                              -> update_entry
/// DELETE /{id}                              -> delete_entry
/// POST   /{id}/comments                     -> add_comment
/// POST   /{id}/comments/{comment_id}/like   -> like_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(entries::list_entries).post(entries::create_entry),
        )
        .route(
            "/{id}",
            get(entries::get_entry)
                .put(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route("/{id}/comments", post(entries::add_comment))
        .route(
            "/{id}/comments/{comment_id}/like",
            post(entries::like_comment),
        )
}
