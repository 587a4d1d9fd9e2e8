use crate::model::UserRecord;

use super::window::DayWindow;

/// Account counts as of the end of the target day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserMetrics {
    pub total_users: u64,
    pub new_users: u64,
    pub active_users: u64,
    pub premium_users: u64,
}

impl UserMetrics {
    /// Folds every user into the counters.
    ///
    /// Users without a `createdAt`, or created after the day ends, did not
    /// exist yet and are skipped entirely. The other counters overlap freely.
    pub fn collect(users: &[UserRecord], window: &DayWindow, active_window_days: u32) -> Self {
        let active_since = window.active_since(active_window_days);

        users.iter().fold(Self::default(), |acc, user| {
            let Some(created_at) = user.created_at else {
                return acc;
            };
            if created_at > window.end() {
                return acc;
            }

            let is_new = window.contains(created_at);
            let is_active = user
                .last_login
                .is_some_and(|at| active_since <= at && at <= window.end());

            Self {
                total_users: acc.total_users + 1,
                new_users: acc.new_users + u64::from(is_new),
                active_users: acc.active_users + u64::from(is_active),
                premium_users: acc.premium_users + u64::from(user.is_premium()),
            }
        })
    }
}
