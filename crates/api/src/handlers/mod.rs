//! Request handlers for the journal API.
//!
//! Each submodule provides async handler functions for one resource. Handlers
//! stay thin: parse the request, delegate to a typed store from
//! [`crate::state::AppState`], and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod entries;
pub mod photo_requests;
pub mod questions;
pub mod timeline;
