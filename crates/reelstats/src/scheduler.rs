//! Daily trigger for the aggregation job.
//!
//! Fire times come from a cron expression evaluated in the configured time
//! zone. Each fire aggregates "yesterday" relative to the fire time. A run
//! that fails or times out is logged and skipped; the next fire does not
//! retry it (use a backfill for that).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tokio::sync::{broadcast, Notify};

use crate::analytics::DailyAggregator;
use crate::config::Config;
use crate::error::{ConfigError, ReelstatsError};

/// Periodic scheduler aggregating the previous day on every fire.
pub struct DailyScheduler {
    aggregator: Arc<DailyAggregator>,
    schedule: Schedule,
    timezone: Tz,
    shutdown: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl DailyScheduler {
    /// Creates a scheduler firing on `schedule` in the aggregator's time zone.
    pub fn new(aggregator: Arc<DailyAggregator>, schedule: Schedule) -> Self {
        let timezone = aggregator.settings().timezone;
        Self {
            aggregator,
            schedule,
            timezone,
            shutdown: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn from_config(
        aggregator: Arc<DailyAggregator>,
        config: &Config,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(aggregator, config.parse_schedule()?))
    }

    /// Next fire time strictly after `after`.
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        next_fire(&self.schedule, self.timezone, after)
    }

    /// Start the schedule loop in a background thread.
    /// Accepts a trigger receiver for manual runs.
    pub fn start(
        &self,
        mut trigger_rx: broadcast::Receiver<()>,
    ) -> Result<JoinHandle<()>, ReelstatsError> {
        let aggregator = Arc::clone(&self.aggregator);
        let shutdown = Arc::clone(&self.shutdown);
        let wake = Arc::clone(&self.wake);
        let schedule = self.schedule.clone();
        let timezone = self.timezone;

        std::thread::Builder::new()
            .name("reelstats-scheduler".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        log::error!("Failed to build scheduler runtime: {}", e);
                        return;
                    }
                };

                rt.block_on(async {
                    loop {
                        if shutdown.load(Ordering::Acquire) {
                            break;
                        }

                        let now = Utc::now();
                        let Some(next) = next_fire(&schedule, timezone, now) else {
                            log::error!("Schedule has no upcoming fire time, stopping");
                            break;
                        };
                        let wait = (next - now).to_std().unwrap_or_default();
                        log::info!("Next daily aggregation at {}", next);

                        tokio::select! {
                            _ = tokio::time::sleep(wait) => {},
                            Ok(()) = trigger_rx.recv() => {
                                log::info!("Manual daily aggregation triggered");
                            },
                            _ = wake.notified() => {},
                        }

                        if shutdown.load(Ordering::Acquire) {
                            break;
                        }

                        let date = aggregator.yesterday();
                        match aggregator.run_with_timeout(date).await {
                            Ok(_) => log::info!("Daily analytics for {} complete", date),
                            Err(e) => log::error!(
                                "Daily aggregation for {} failed, waiting for next fire: {}",
                                date,
                                e
                            ),
                        }
                    }
                    log::info!("Daily scheduler stopped");
                });
            })
            .map_err(|e| ReelstatsError::Scheduler(format!("failed to spawn thread: {}", e)))
    }

    /// Signals the scheduler to stop and wakes it if it is waiting.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.wake.notify_one();
    }
}

/// Next fire time of `schedule`, interpreted in `tz`, strictly after `after`.
pub fn next_fire(schedule: &Schedule, tz: Tz, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule
        .after(&after.with_timezone(&tz))
        .next()
        .map(|at| at.with_timezone(&Utc))
}
