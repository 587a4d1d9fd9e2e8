//! Typed views over the platform's document collections.

pub mod content;
pub mod lenient;
pub mod snapshot;
pub mod transaction;
pub mod user;

pub use content::{ContentKind, ContentRecord};
pub use snapshot::{DailySnapshot, SNAPSHOT_COLLECTION};
pub use transaction::{PaymentStatus, RevenueStream, TransactionRecord, TRANSACTIONS_COLLECTION};
pub use user::{UserRecord, USERS_COLLECTION};

use serde::de::DeserializeOwned;

use crate::store::Document;

/// Decodes every document of a collection into `T`.
///
/// Field defects are absorbed by the lenient decoders; a document that is
/// not a JSON object at all is skipped with a warning.
pub fn decode_documents<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    let total = docs.len();
    let records: Vec<T> = docs
        .into_iter()
        .filter_map(|doc| {
            if !doc.data.is_object() {
                log::warn!("Skipping {}/{}: document is not an object", collection, doc.id);
                return None;
            }
            match serde_json::from_value(doc.data) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping {}/{}: {}", collection, doc.id, e);
                    None
                }
            }
        })
        .collect();

    if records.len() < total {
        log::debug!(
            "Decoded {} of {} documents from '{}'",
            records.len(),
            total,
            collection
        );
    }

    records
}
