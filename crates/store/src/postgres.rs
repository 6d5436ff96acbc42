//! Postgres-backed store: one `documents` table of JSONB rows.
//!
//! Documents are keyed by (owner, collection, doc id) with a version column
//! for compare-and-swap. Partial updates use the JSONB `||` operator, which
//! matches the trait's shallow-merge contract. Watch channels are kept per
//! process: watchers see mutations made through this handle, and the
//! registry lock serializes snapshot reads against sends so receivers never
//! observe snapshots out of order.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use memoir_core::types::Timestamp;

use crate::document::{Collection, Document, DocumentStore, Snapshot};
use crate::error::StoreError;

/// Column list for documents queries.
const COLUMNS: &str = "doc_id, version, data, updated_at";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Apply embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    doc_id: String,
    version: i64,
    data: Value,
    updated_at: Timestamp,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.doc_id,
            version: row.version,
            data: row.data,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres [`DocumentStore`].
pub struct PostgresStore {
    pool: PgPool,
    watchers: Mutex<HashMap<(String, Collection), watch::Sender<Snapshot>>>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            watchers: Mutex::new(HashMap::new()),
        }
    }

    async fn fetch_snapshot(
        &self,
        owner: &str,
        collection: Collection,
    ) -> Result<Snapshot, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE owner_id = $1 AND collection = $2
             ORDER BY doc_id ASC"
        );
        let rows = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(owner)
            .bind(collection.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    /// Re-read the collection and push it to watchers. The registry lock is
    /// held across the read and the send, so two publishes cannot cross.
    async fn publish(&self, owner: &str, collection: Collection) -> Result<(), StoreError> {
        let key = (owner.to_string(), collection);
        let mut watchers = self.watchers.lock().await;
        let open = match watchers.get(&key) {
            Some(sender) => !sender.is_closed(),
            None => return Ok(()),
        };
        if !open {
            watchers.remove(&key);
            return Ok(());
        }

        let snapshot = self.fetch_snapshot(owner, collection).await?;
        if let Some(sender) = watchers.get(&key) {
            sender.send_replace(snapshot);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn create(
        &self,
        owner: &str,
        collection: Collection,
        data: Value,
    ) -> Result<Document, StoreError> {
        let id = Uuid::now_v7().to_string();
        let query = format!(
            "INSERT INTO documents (owner_id, collection, doc_id, data)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(owner)
            .bind(collection.as_str())
            .bind(&id)
            .bind(&data)
            .fetch_one(&self.pool)
            .await?;

        self.publish(owner, collection).await?;
        Ok(row.into())
    }

    async fn put(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        data: Value,
    ) -> Result<Document, StoreError> {
        let query = format!(
            "INSERT INTO documents (owner_id, collection, doc_id, data)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (owner_id, collection, doc_id)
             DO UPDATE SET data = EXCLUDED.data,
                           version = documents.version + 1,
                           updated_at = now()
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(owner)
            .bind(collection.as_str())
            .bind(id)
            .bind(&data)
            .fetch_one(&self.pool)
            .await?;

        self.publish(owner, collection).await?;
        Ok(row.into())
    }

    async fn merge(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> Result<Document, StoreError> {
        if !patch.is_object() {
            return Err(StoreError::Validation(
                "Merge patch must be a JSON object".to_string(),
            ));
        }

        let query = format!(
            "UPDATE documents
             SET data = data || $4, version = version + 1, updated_at = now()
             WHERE owner_id = $1 AND collection = $2 AND doc_id = $3
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(owner)
            .bind(collection.as_str())
            .bind(id)
            .bind(&patch)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(collection.entity_name(), id))?;

        self.publish(owner, collection).await?;
        Ok(row.into())
    }

    async fn put_if_version(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
        expected_version: i64,
        data: Value,
    ) -> Result<Document, StoreError> {
        let query = format!(
            "UPDATE documents
             SET data = $5, version = version + 1, updated_at = now()
             WHERE owner_id = $1 AND collection = $2 AND doc_id = $3
               AND version = $4
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(owner)
            .bind(collection.as_str())
            .bind(id)
            .bind(expected_version)
            .bind(&data)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                self.publish(owner, collection).await?;
                Ok(row.into())
            }
            // Missed either on existence or on version; look again to tell.
            None => match self.get(owner, collection, id).await? {
                Some(_) => Err(StoreError::version_conflict(collection.entity_name(), id)),
                None => Err(StoreError::not_found(collection.entity_name(), id)),
            },
        }
    }

    async fn get(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE owner_id = $1 AND collection = $2 AND doc_id = $3"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(owner)
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Document::from))
    }

    async fn list(&self, owner: &str, collection: Collection) -> Result<Snapshot, StoreError> {
        self.fetch_snapshot(owner, collection).await
    }

    async fn delete(
        &self,
        owner: &str,
        collection: Collection,
        id: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM documents
             WHERE owner_id = $1 AND collection = $2 AND doc_id = $3",
        )
        .bind(owner)
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            self.publish(owner, collection).await?;
        }
        Ok(removed)
    }

    async fn watch(
        &self,
        owner: &str,
        collection: Collection,
    ) -> Result<watch::Receiver<Snapshot>, StoreError> {
        let key = (owner.to_string(), collection);
        let mut watchers = self.watchers.lock().await;
        if let Some(sender) = watchers.get(&key) {
            // Any mutation through this handle would have refreshed or
            // pruned this sender, so its value is still the latest this
            // process has seen.
            return Ok(sender.subscribe());
        }

        let snapshot = self.fetch_snapshot(owner, collection).await?;
        let (sender, receiver) = watch::channel(snapshot);
        watchers.insert(key, sender);
        Ok(receiver)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await?;
        Ok(())
    }
}
