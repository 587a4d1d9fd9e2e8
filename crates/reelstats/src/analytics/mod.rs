//! Daily analytics aggregation.
//!
//! A run resolves the target day, folds users, transactions and the four
//! catalog collections into counters, derives engagement figures and writes
//! one flat snapshot to `analytics/daily/stats/{YYYY-MM-DD}`.

pub mod content;
pub mod engagement;
pub mod error;
pub mod job;
pub mod reports;
pub mod revenue;
pub mod users;
pub mod window;

pub use content::{ContentMetrics, ContentTally};
pub use engagement::{EngagementMetrics, EngagementModel};
pub use error::AggregationError;
pub use job::{aggregate, AggregationInputs, AggregationSettings, DailyAggregator};
pub use reports::{find_snapshot, list_snapshots, summarize, ReportSummary};
pub use revenue::RevenueMetrics;
pub use users::UserMetrics;
pub use window::{Clock, DayWindow, FixedClock, SystemClock};
