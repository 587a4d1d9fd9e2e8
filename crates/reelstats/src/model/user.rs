use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::lenient;

pub const USERS_COLLECTION: &str = "users";

/// Subscription status that marks a premium account.
pub const ACTIVE_SUBSCRIPTION: &str = "active";

/// The fields of a user account the analytics job reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "subscription",
        deserialize_with = "lenient::subscription_status"
    )]
    pub subscription_status: Option<String>,
}

impl UserRecord {
    pub fn is_premium(&self) -> bool {
        self.subscription_status.as_deref() == Some(ACTIVE_SUBSCRIPTION)
    }
}
