//! Document persistence for the memoir journal.
//!
//! The [`DocumentStore`] trait models the hosted document database the
//! journal was designed against: four owner-scoped collections of JSON
//! documents with create / overwrite / merge / versioned overwrite / delete
//! and live subscription with full-snapshot re-emit. Two backends implement
//! it ([`MemoryStore`] for tests and development, [`PostgresStore`] for real
//! deployments), and one typed store per collection wraps it with the
//! domain contract: validation before any backend call, server timestamps,
//! and compare-and-swap where concurrent writes matter.

pub mod document;
pub mod entries;
pub mod error;
pub mod id;
pub mod memory;
pub mod photo_requests;
pub mod postgres;
pub mod questions;
pub mod timeline;

pub use document::{Collection, Document, DocumentStore, Snapshot};
pub use entries::EntryStore;
pub use error::StoreError;
pub use id::TickIdFactory;
pub use memory::MemoryStore;
pub use photo_requests::PhotoRequestStore;
pub use postgres::{create_pool, health_check, run_migrations, PostgresStore};
pub use questions::QuestionStore;
pub use timeline::TimelineStore;
