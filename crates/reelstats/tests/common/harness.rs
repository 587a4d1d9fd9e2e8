//! Test harness for isolated aggregation runs.
//!
//! The `TestHarness` struct owns a temporary SQLite database and an
//! aggregator whose clock is pinned, so "yesterday" is always
//! 2026-10-16 in UTC unless a test asks otherwise.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;

use reelstats::analytics::DailyAggregator;
use reelstats::model::snapshot;
use reelstats::model::SNAPSHOT_COLLECTION;
use reelstats::{AggregationSettings, Database, DocumentStore, FixedClock, SqliteStore};

/// Test harness providing an isolated store and aggregator.
pub struct TestHarness {
    /// Keeps the database file alive for the harness lifetime.
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
    pub store: Arc<SqliteStore>,
    pub now: DateTime<Utc>,
}

impl TestHarness {
    /// Creates a harness with the clock at 2026-10-17T00:05:00Z.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("reelstats.db");
        let db = Database::open(&db_path).expect("Failed to open database");
        let store = Arc::new(SqliteStore::new(db.clone()));

        Self {
            temp_dir,
            db_path,
            db,
            store,
            now: Utc.with_ymd_and_hms(2026, 10, 17, 0, 5, 0).unwrap(),
        }
    }

    /// The day a scheduled run at `now` aggregates.
    pub fn target_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    /// Start of the target day in UTC.
    pub fn day_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap()
    }

    /// An instant `hours` after the start of the target day.
    pub fn at(hours: i64) -> DateTime<Utc> {
        Self::day_start() + Duration::hours(hours)
    }

    pub fn aggregator(&self) -> DailyAggregator {
        self.aggregator_with(AggregationSettings::default())
    }

    pub fn aggregator_with(&self, settings: AggregationSettings) -> DailyAggregator {
        let store: Arc<dyn DocumentStore> = self.store.clone();
        DailyAggregator::new(store, settings).with_clock(Arc::new(FixedClock(self.now)))
    }

    /// Inserts a source document.
    pub async fn insert(&self, collection: &str, id: &str, data: Value) {
        self.store
            .put(collection, id, data)
            .await
            .expect("Failed to insert document");
    }

    /// Inserts documents with generated ids `{prefix}-{n}`.
    pub async fn insert_all(&self, collection: &str, prefix: &str, docs: Vec<Value>) {
        for (n, doc) in docs.into_iter().enumerate() {
            self.insert(collection, &format!("{}-{}", prefix, n), doc).await;
        }
    }

    /// The stored snapshot body exactly as persisted.
    pub fn raw_snapshot(&self, date: NaiveDate) -> Option<String> {
        let id = snapshot::document_id(date);
        self.db
            .with_conn(|conn| {
                let mut stmt =
                    conn.prepare("SELECT data FROM documents WHERE collection = ?1 AND id = ?2")?;
                let mut rows = stmt.query(rusqlite::params![SNAPSHOT_COLLECTION, id])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, String>(0)?)),
                    None => Ok(None),
                }
            })
            .expect("Failed to read snapshot row")
    }

    /// Number of stored snapshot documents.
    pub fn snapshot_count(&self) -> u32 {
        self.db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                    [SNAPSHOT_COLLECTION],
                    |r| r.get(0),
                )?)
            })
            .expect("Failed to count snapshots")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
