use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::analytics::engagement::EngagementModel;
use crate::analytics::job::DEFAULT_ACTIVE_WINDOW_DAYS;
use crate::error::ConfigError;

pub const CONFIG_VERSION: &str = "1.0";

/// Fires at 00:05 every day: `sec min hour day-of-month month day-of-week`.
pub const DEFAULT_SCHEDULE: &str = "0 5 0 * * *";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// SQLite file holding the collections. Defaults to
    /// `~/.reelstats/data/reelstats.db`.
    #[serde(default)]
    pub database_path: Option<String>,
    /// IANA zone the calendar day is resolved in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Cron expression (with seconds) for the daily trigger.
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Budget for one run before it is abandoned.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_active_window_days")]
    pub active_window_days: u32,
    #[serde(default)]
    pub modeling: EngagementModel,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_schedule() -> String {
    DEFAULT_SCHEDULE.to_string()
}

fn default_timeout_secs() -> u64 {
    540
}

fn default_active_window_days() -> u32 {
    DEFAULT_ACTIVE_WINDOW_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            database_path: None,
            timezone: default_timezone(),
            schedule: default_schedule(),
            timeout_secs: default_timeout_secs(),
            active_window_days: default_active_window_days(),
            modeling: EngagementModel::default(),
        }
    }
}

impl Config {
    pub fn parse_timezone(&self) -> Result<Tz, ConfigError> {
        Tz::from_str(&self.timezone).map_err(|e| ConfigError::InvalidTimezone {
            name: self.timezone.clone(),
            reason: e.to_string(),
        })
    }

    pub fn parse_schedule(&self) -> Result<cron::Schedule, ConfigError> {
        cron::Schedule::from_str(&self.schedule).map_err(|e| ConfigError::InvalidSchedule {
            expression: self.schedule.clone(),
            reason: e.to_string(),
        })
    }

    /// The configured database path, or the per-user default.
    pub fn resolve_database_path(&self) -> Option<PathBuf> {
        self.database_path
            .as_ref()
            .map(PathBuf::from)
            .or_else(crate::db::default_database_path)
    }
}
