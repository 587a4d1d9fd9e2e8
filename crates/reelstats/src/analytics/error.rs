use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Failed to read collection '{collection}': {source}")]
    Read {
        collection: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to write snapshot '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to encode snapshot for {date}: {source}")]
    Encode {
        date: NaiveDate,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored snapshot '{path}' is invalid: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Aggregation for {date} exceeded its {budget:?} budget")]
    Timeout { date: NaiveDate, budget: Duration },

    #[error("Invalid date range: {reason}")]
    InvalidRange { reason: String },
}
