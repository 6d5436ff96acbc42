//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope so the frontend can
//! unwrap every success the same way. Use [`DataResponse`] instead of ad-hoc
//! `serde_json::json!({ "data": ... })` to keep the shape type-checked.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: entries }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
