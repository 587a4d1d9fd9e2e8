//! Schema versioning for the document store.
//!
//! Applied versions are recorded in `_migrations`. Each pending step runs
//! inside its own transaction together with its bookkeeping row, so a
//! failed step leaves the schema at the previous version.

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};

use super::error::DatabaseError;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "create_documents",
        sql: include_str!("sql/001_create_documents.sql"),
    },
    Step {
        version: 2,
        name: "index_documents_updated_at",
        sql: include_str!("sql/002_index_documents_updated_at.sql"),
    },
];

/// Latest schema version this build knows about.
pub fn latest_version() -> u32 {
    STEPS.last().map(|s| s.version).unwrap_or(0)
}

/// Highest version recorded in `_migrations`, or 0 for a fresh database.
pub fn current_version(conn: &Connection) -> Result<u32, DatabaseError> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?)
}

/// Brings the schema up to `latest_version()`.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        );",
    )?;

    let current = current_version(conn)?;
    if current > latest_version() {
        return Err(DatabaseError::Migration {
            version: current,
            reason: format!(
                "database schema is newer than this build (latest known v{})",
                latest_version()
            ),
        });
    }

    for step in STEPS.iter().filter(|s| s.version > current) {
        apply(conn, step)?;
    }

    Ok(())
}

fn apply(conn: &Connection, step: &Step) -> Result<(), DatabaseError> {
    log::info!("Applying schema v{} ({})", step.version, step.name);

    let failed = |e: rusqlite::Error| DatabaseError::Migration {
        version: step.version,
        reason: e.to_string(),
    };

    let tx = conn.unchecked_transaction().map_err(failed)?;
    tx.execute_batch(step.sql).map_err(failed)?;
    tx.execute(
        "INSERT INTO _migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        params![
            step.version,
            step.name,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        ],
    )
    .map_err(failed)?;
    tx.commit().map_err(failed)
}
