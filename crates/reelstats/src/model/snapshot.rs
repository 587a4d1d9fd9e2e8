use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding one snapshot document per calendar day.
pub const SNAPSHOT_COLLECTION: &str = "analytics/daily/stats";

/// One day's aggregate report.
///
/// Flat and fully populated: every field is written on every run, zeros
/// included, so a stored snapshot never depends on what it replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub date: NaiveDate,
    /// Start of the aggregated day, not the time the job ran.
    pub timestamp: DateTime<Utc>,

    pub total_users: u64,
    pub new_users: u64,
    pub active_users: u64,
    pub premium_users: u64,

    pub total_revenue: f64,
    pub subscription_revenue: f64,
    pub event_revenue: f64,
    pub ppv_revenue: f64,

    pub successful_payments: u64,
    pub failed_payments: u64,

    pub total_views: f64,
    pub movie_views: f64,
    pub series_views: f64,
    pub short_film_views: f64,
    pub event_views: f64,

    pub watch_time: f64,
    pub avg_watch_time: f64,
    pub engagement: f64,
    pub completion_rate: f64,

    pub avg_rating: f64,
    pub total_ratings: u64,
}

impl DailySnapshot {
    /// Document id: the ISO date of the aggregated day.
    pub fn document_id(&self) -> String {
        document_id(self.date)
    }

    /// Full document path, e.g. `analytics/daily/stats/2026-10-16`.
    pub fn document_path(&self) -> String {
        document_path(self.date)
    }
}

pub fn document_id(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn document_path(date: NaiveDate) -> String {
    format!("{}/{}", SNAPSHOT_COLLECTION, document_id(date))
}
