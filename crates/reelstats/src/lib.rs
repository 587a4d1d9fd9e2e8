pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod store;

pub use analytics::{
    AggregationError, AggregationSettings, Clock, DailyAggregator, DayWindow, EngagementModel,
    FixedClock, SystemClock,
};
pub use config::{load_config, Config};
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, ReelstatsError, Result};
pub use model::DailySnapshot;
pub use scheduler::DailyScheduler;
pub use store::{Document, DocumentStore, SqliteStore, StoreError};
