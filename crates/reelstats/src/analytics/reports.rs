//! Read side for stored daily snapshots.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::snapshot::{self, DailySnapshot, SNAPSHOT_COLLECTION};
use crate::store::{Document, DocumentStore};

use super::error::AggregationError;

/// Loads the snapshot for one day, if the job has produced it.
pub async fn find_snapshot(
    store: &dyn DocumentStore,
    date: NaiveDate,
) -> Result<Option<DailySnapshot>, AggregationError> {
    let id = snapshot::document_id(date);
    let doc = store
        .get(SNAPSHOT_COLLECTION, &id)
        .await
        .map_err(|source| AggregationError::Read {
            collection: SNAPSHOT_COLLECTION.to_string(),
            source,
        })?;
    doc.map(decode).transpose()
}

/// Loads stored snapshots in `[from, to]` (either bound optional), oldest first.
pub async fn list_snapshots(
    store: &dyn DocumentStore,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<DailySnapshot>, AggregationError> {
    let from_id = from.map(snapshot::document_id);
    let to_id = to.map(snapshot::document_id);
    let docs = store
        .list_range(SNAPSHOT_COLLECTION, from_id.as_deref(), to_id.as_deref())
        .await
        .map_err(|source| AggregationError::Read {
            collection: SNAPSHOT_COLLECTION.to_string(),
            source,
        })?;
    docs.into_iter().map(decode).collect()
}

fn decode(doc: Document) -> Result<DailySnapshot, AggregationError> {
    serde_json::from_value(doc.data).map_err(|source| AggregationError::Decode {
        path: format!("{}/{}", SNAPSHOT_COLLECTION, doc.id),
        source,
    })
}

/// Totals across a run of daily snapshots, as shown in revenue reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    pub total_revenue: f64,
    pub subscription_revenue: f64,
    pub event_revenue: f64,
    pub ppv_revenue: f64,
    pub successful_payments: u64,
    pub failed_payments: u64,
    /// Completed share of decided payments, in percent.
    pub payment_success_rate: f64,
    pub new_users: u64,
    /// `totalUsers` of the latest day in the range.
    pub latest_total_users: u64,
    pub average_daily_revenue: f64,
}

/// Summarizes snapshots sorted oldest first.
pub fn summarize(snapshots: &[DailySnapshot]) -> ReportSummary {
    let mut summary = snapshots
        .iter()
        .fold(ReportSummary::default(), |acc, s| ReportSummary {
            days: acc.days + 1,
            total_revenue: acc.total_revenue + s.total_revenue,
            subscription_revenue: acc.subscription_revenue + s.subscription_revenue,
            event_revenue: acc.event_revenue + s.event_revenue,
            ppv_revenue: acc.ppv_revenue + s.ppv_revenue,
            successful_payments: acc.successful_payments + s.successful_payments,
            failed_payments: acc.failed_payments + s.failed_payments,
            new_users: acc.new_users + s.new_users,
            ..acc
        });

    summary.from = snapshots.first().map(|s| s.date);
    summary.to = snapshots.last().map(|s| s.date);
    summary.latest_total_users = snapshots.last().map(|s| s.total_users).unwrap_or(0);

    let decided = summary.successful_payments + summary.failed_payments;
    if decided > 0 {
        summary.payment_success_rate = summary.successful_payments as f64 / decided as f64 * 100.0;
    }
    if summary.days > 0 {
        summary.average_daily_revenue = summary.total_revenue / summary.days as f64;
    }

    summary
}
