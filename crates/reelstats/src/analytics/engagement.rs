//! Engagement figures derived from view and user totals.
//!
//! The platform does not record watch durations or completion events, so
//! these figures come from fixed modeling assumptions rather than
//! measurements. They are kept as named, overridable parameters until real
//! instrumentation exists.

use serde::{Deserialize, Serialize};

/// Assumed minutes watched per view.
pub const DEFAULT_WATCH_MINUTES_PER_VIEW: f64 = 45.0;
/// Reported average watch time in minutes.
pub const DEFAULT_AVG_WATCH_TIME: f64 = 45.0;
/// Reported completion rate in percent.
pub const DEFAULT_COMPLETION_RATE: f64 = 60.0;

/// Modeling parameters for the derived engagement figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementModel {
    #[serde(default = "default_watch_minutes_per_view")]
    pub watch_minutes_per_view: f64,
    #[serde(default = "default_avg_watch_time")]
    pub avg_watch_time: f64,
    #[serde(default = "default_completion_rate")]
    pub completion_rate: f64,
}

fn default_watch_minutes_per_view() -> f64 {
    DEFAULT_WATCH_MINUTES_PER_VIEW
}

fn default_avg_watch_time() -> f64 {
    DEFAULT_AVG_WATCH_TIME
}

fn default_completion_rate() -> f64 {
    DEFAULT_COMPLETION_RATE
}

impl Default for EngagementModel {
    fn default() -> Self {
        Self {
            watch_minutes_per_view: DEFAULT_WATCH_MINUTES_PER_VIEW,
            avg_watch_time: DEFAULT_AVG_WATCH_TIME,
            completion_rate: DEFAULT_COMPLETION_RATE,
        }
    }
}

/// Derived engagement figures for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngagementMetrics {
    /// Total minutes watched.
    pub watch_time: f64,
    pub avg_watch_time: f64,
    /// Views per active user, as a percentage.
    pub engagement: f64,
    pub completion_rate: f64,
}

impl EngagementModel {
    pub fn derive(&self, total_views: f64, active_users: u64) -> EngagementMetrics {
        EngagementMetrics {
            watch_time: total_views * self.watch_minutes_per_view,
            avg_watch_time: self.avg_watch_time,
            engagement: if active_users > 0 {
                total_views / active_users as f64 * 100.0
            } else {
                0.0
            },
            completion_rate: self.completion_rate,
        }
    }
}
