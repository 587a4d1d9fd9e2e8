use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::lenient;

pub const TRANSACTIONS_COLLECTION: &str = "transactions";

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaymentStatus {
    Completed,
    Failed,
    /// Pending, refunded, unknown or missing. Ignored by the revenue fold.
    #[default]
    Other,
}

impl PaymentStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other,
        }
    }
}

/// Revenue bucket a completed payment is routed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevenueStream {
    Subscription,
    Event,
    Ppv,
    #[default]
    Other,
}

impl RevenueStream {
    pub fn from_label(label: &str) -> Self {
        match label {
            "subscription" => Self::Subscription,
            "event" => Self::Event,
            "ppv" => Self::Ppv,
            _ => Self::Other,
        }
    }
}

/// The fields of a payment attempt the analytics job reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "payment_status")]
    pub status: PaymentStatus,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "revenue_stream")]
    pub stream: RevenueStream,
}

fn payment_status<'de, D>(deserializer: D) -> Result<PaymentStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::string(deserializer)?
        .as_deref()
        .map(PaymentStatus::from_label)
        .unwrap_or_default())
}

fn revenue_stream<'de, D>(deserializer: D) -> Result<RevenueStream, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::string(deserializer)?
        .as_deref()
        .map(RevenueStream::from_label)
        .unwrap_or_default())
}
