//! CRUD for the `documents` table.
//!
//! Every document is addressed by `(collection, id)` and stores its body as
//! JSON text. Collections are plain strings, so nested paths such as
//! `analytics/daily/stats` work the same way as top-level ones.

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Row};
use serde_json::Value;

use super::{Database, DatabaseError};

/// A stored document with its decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub collection: String,
    pub id: String,
    pub data: Value,
    pub updated_at: String,
}

/// Raw row before the body is decoded.
struct RawRow {
    collection: String,
    id: String,
    data: String,
    updated_at: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            collection: row.get("collection")?,
            id: row.get("id")?,
            data: row.get("data")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn decode(self) -> Result<DocumentRow, DatabaseError> {
        let data = serde_json::from_str(&self.data).map_err(|e| DatabaseError::Body {
            collection: self.collection.clone(),
            id: self.id.clone(),
            source: e,
        })?;
        Ok(DocumentRow {
            collection: self.collection,
            id: self.id,
            data,
            updated_at: self.updated_at,
        })
    }
}

/// Writes a document, replacing any existing body under the same key.
pub fn put(db: &Database, collection: &str, id: &str, data: &Value) -> Result<(), DatabaseError> {
    let body = serde_json::to_string(data).map_err(|e| DatabaseError::Body {
        collection: collection.to_string(),
        id: id.to_string(),
        source: e,
    })?;
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO documents (collection, id, data, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![collection, id, body, now],
        )?;
        Ok(())
    })
}

/// Finds a single document.
pub fn get(db: &Database, collection: &str, id: &str) -> Result<Option<DocumentRow>, DatabaseError> {
    let raw = db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT collection, id, data, updated_at FROM documents
             WHERE collection = ?1 AND id = ?2",
        )?;
        let mut rows = stmt.query_map(params![collection, id], RawRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })?;

    raw.map(RawRow::decode).transpose()
}

/// Lists every document in a collection, ordered by id.
pub fn list(db: &Database, collection: &str) -> Result<Vec<DocumentRow>, DatabaseError> {
    let raw = db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT collection, id, data, updated_at FROM documents
             WHERE collection = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![collection], RawRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;

    raw.into_iter().map(RawRow::decode).collect()
}

/// Lists documents whose id falls in `[from_id, to_id]`, ordered by id.
///
/// Ids are compared as text, which orders ISO dates chronologically.
pub fn list_id_range(
    db: &Database,
    collection: &str,
    from_id: Option<&str>,
    to_id: Option<&str>,
) -> Result<Vec<DocumentRow>, DatabaseError> {
    let raw = db.with_conn(|conn| {
        let mut conditions = vec!["collection = ?1".to_string()];
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> =
            vec![Box::new(collection.to_string())];

        if let Some(from) = from_id {
            conditions.push(format!("id >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(from.to_string()));
        }
        if let Some(to) = to_id {
            conditions.push(format!("id <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(to.to_string()));
        }

        let sql = format!(
            "SELECT collection, id, data, updated_at FROM documents WHERE {} ORDER BY id",
            conditions.join(" AND ")
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), RawRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;

    raw.into_iter().map(RawRow::decode).collect()
}
