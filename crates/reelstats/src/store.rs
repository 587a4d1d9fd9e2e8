//! Async document store seam used by the aggregation job.
//!
//! The job only needs whole-collection scans and full-replace writes, so the
//! trait stays that small. `SqliteStore` adapts the blocking `db` layer by
//! running every call on tokio's blocking pool.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::db::{document_repo, Database, DatabaseError};

/// Errors from a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Store task failed: {0}")]
    Task(String),
}

/// A document with its id, as returned by collection scans.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Collection-oriented document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document in the collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Returns documents whose id lies in the inclusive range, ordered by id.
    async fn list_range(
        &self,
        collection: &str,
        from_id: Option<&str>,
        to_id: Option<&str>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Returns a single document.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Creates or fully replaces a document.
    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;
}

/// `DocumentStore` backed by the SQLite `documents` table.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn blocking<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Database) -> Result<T, DatabaseError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
            .map_err(StoreError::from)
    }
}

fn into_documents(rows: Vec<document_repo::DocumentRow>) -> Vec<Document> {
    rows.into_iter()
        .map(|row| Document {
            id: row.id,
            data: row.data,
        })
        .collect()
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collection = collection.to_string();
        let rows = self
            .blocking(move |db| document_repo::list(db, &collection))
            .await?;
        Ok(into_documents(rows))
    }

    async fn list_range(
        &self,
        collection: &str,
        from_id: Option<&str>,
        to_id: Option<&str>,
    ) -> Result<Vec<Document>, StoreError> {
        let collection = collection.to_string();
        let from_id = from_id.map(str::to_string);
        let to_id = to_id.map(str::to_string);
        let rows = self
            .blocking(move |db| {
                document_repo::list_id_range(db, &collection, from_id.as_deref(), to_id.as_deref())
            })
            .await?;
        Ok(into_documents(rows))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collection = collection.to_string();
        let id = id.to_string();
        let row = self
            .blocking(move |db| document_repo::get(db, &collection, &id))
            .await?;
        Ok(row.map(|row| Document {
            id: row.id,
            data: row.data,
        }))
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.blocking(move |db| document_repo::put(db, &collection, &id, &data))
            .await
    }
}
