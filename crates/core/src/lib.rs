//! Pure domain layer for the memoir journal: models, validation, and the
//! derived views (entry filtering, timeline aggregation, prompt templates).
//!
//! This crate has no I/O and no async. The store and API layers call into it
//! before any document write, so every layer agrees on what a valid document
//! looks like.

pub mod entry;
pub mod photo_request;
pub mod prompts;
pub mod question;
pub mod search;
pub mod timeline;
pub mod types;
