//! The daily aggregation job: read, fold, write one snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use tracing::{debug, info, info_span, Instrument};

use crate::config::Config;
use crate::error::ConfigError;
use crate::model::{
    decode_documents, ContentKind, ContentRecord, DailySnapshot, TransactionRecord, UserRecord,
    SNAPSHOT_COLLECTION, TRANSACTIONS_COLLECTION, USERS_COLLECTION,
};
use crate::store::DocumentStore;

use super::content::{ContentMetrics, ContentTally};
use super::engagement::EngagementModel;
use super::error::AggregationError;
use super::revenue::RevenueMetrics;
use super::users::UserMetrics;
use super::window::{self, Clock, DayWindow, SystemClock};

pub const DEFAULT_ACTIVE_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(540);
/// Longest range a single backfill call accepts, in days.
pub const MAX_BACKFILL_DAYS: i64 = 366;

/// Knobs the job reads from configuration.
#[derive(Debug, Clone)]
pub struct AggregationSettings {
    pub timezone: Tz,
    pub active_window_days: u32,
    pub model: EngagementModel,
    pub timeout: Duration,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            active_window_days: DEFAULT_ACTIVE_WINDOW_DAYS,
            model: EngagementModel::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AggregationSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            timezone: config.parse_timezone()?,
            active_window_days: config.active_window_days,
            model: config.modeling,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

/// Decoded contents of every source collection.
#[derive(Debug, Clone, Default)]
pub struct AggregationInputs {
    pub users: Vec<UserRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub movies: Vec<ContentRecord>,
    pub series: Vec<ContentRecord>,
    pub short_films: Vec<ContentRecord>,
    pub events: Vec<ContentRecord>,
}

/// Computes the snapshot for one day. Pure: same inputs, same output.
pub fn aggregate(
    window: &DayWindow,
    inputs: &AggregationInputs,
    settings: &AggregationSettings,
) -> DailySnapshot {
    let users = UserMetrics::collect(&inputs.users, window, settings.active_window_days);
    let revenue = RevenueMetrics::collect(&inputs.transactions, window);
    let content = ContentMetrics::combine(
        ContentTally::collect(&inputs.movies),
        ContentTally::collect(&inputs.series),
        ContentTally::collect(&inputs.short_films),
        ContentTally::collect(&inputs.events),
    );
    let engagement = settings
        .model
        .derive(content.total_views, users.active_users);

    DailySnapshot {
        date: window.date(),
        timestamp: window.start(),
        total_users: users.total_users,
        new_users: users.new_users,
        active_users: users.active_users,
        premium_users: users.premium_users,
        total_revenue: revenue.total_revenue,
        subscription_revenue: revenue.subscription_revenue,
        event_revenue: revenue.event_revenue,
        ppv_revenue: revenue.ppv_revenue,
        successful_payments: revenue.successful_payments,
        failed_payments: revenue.failed_payments,
        total_views: content.total_views,
        movie_views: content.movie_views,
        series_views: content.series_views,
        short_film_views: content.short_film_views,
        event_views: content.event_views,
        watch_time: engagement.watch_time,
        avg_watch_time: engagement.avg_watch_time,
        engagement: engagement.engagement,
        completion_rate: engagement.completion_rate,
        avg_rating: content.avg_rating,
        total_ratings: content.total_ratings,
    }
}

/// Runs the aggregation against a document store.
///
/// Every run is a full recompute from the source collections, so running
/// the same date twice over unchanged data rewrites an identical document.
pub struct DailyAggregator {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    settings: AggregationSettings,
}

impl DailyAggregator {
    pub fn new(store: Arc<dyn DocumentStore>, settings: AggregationSettings) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    /// Replaces the wall clock used to resolve "yesterday".
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &AggregationSettings {
        &self.settings
    }

    /// The local calendar day before now, in the configured zone.
    pub fn yesterday(&self) -> NaiveDate {
        window::yesterday(self.clock.now(), self.settings.timezone)
    }

    async fn fetch<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, AggregationError> {
        let docs = self
            .store
            .list(collection)
            .await
            .map_err(|source| AggregationError::Read {
                collection: collection.to_string(),
                source,
            })?;
        debug!(collection, documents = docs.len(), "Fetched collection");
        Ok(decode_documents(collection, docs))
    }

    /// Reads all source collections. The four catalog collections are
    /// independent and fetched concurrently.
    pub async fn load_inputs(&self) -> Result<AggregationInputs, AggregationError> {
        let users = self.fetch::<UserRecord>(USERS_COLLECTION).await?;
        let transactions = self
            .fetch::<TransactionRecord>(TRANSACTIONS_COLLECTION)
            .await?;

        let (movies, series, short_films, events) = tokio::try_join!(
            self.fetch::<ContentRecord>(ContentKind::Movie.collection()),
            self.fetch::<ContentRecord>(ContentKind::Series.collection()),
            self.fetch::<ContentRecord>(ContentKind::ShortFilm.collection()),
            self.fetch::<ContentRecord>(ContentKind::Event.collection()),
        )?;

        Ok(AggregationInputs {
            users,
            transactions,
            movies,
            series,
            short_films,
            events,
        })
    }

    /// Computes the snapshot for `date` without writing it.
    pub async fn preview(&self, date: NaiveDate) -> Result<DailySnapshot, AggregationError> {
        let window = DayWindow::for_date(date, self.settings.timezone);
        let inputs = self.load_inputs().await?;
        Ok(aggregate(&window, &inputs, &self.settings))
    }

    /// Computes and writes the snapshot for `date`, with no time budget.
    pub async fn run_for(&self, date: NaiveDate) -> Result<DailySnapshot, AggregationError> {
        self.run(date, None).await
    }

    /// Computes and writes the snapshot for `date` within the configured
    /// budget, which covers the reads, the fold and the write. On timeout
    /// the run is abandoned and `Timeout` is returned; a write already
    /// handed to the blocking pool may still land.
    pub async fn run_with_timeout(&self, date: NaiveDate) -> Result<DailySnapshot, AggregationError> {
        self.run(date, Some(self.settings.timeout)).await
    }

    /// The scheduled entry point: aggregates yesterday.
    pub async fn run_yesterday(&self) -> Result<DailySnapshot, AggregationError> {
        self.run_with_timeout(self.yesterday()).await
    }

    /// Aggregates every day in `[from, to]` in ascending order, stopping at
    /// the first failure.
    pub async fn backfill(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailySnapshot>, AggregationError> {
        if from > to {
            return Err(AggregationError::InvalidRange {
                reason: format!("start {} is after end {}", from, to),
            });
        }
        let days = (to - from).num_days() + 1;
        if days > MAX_BACKFILL_DAYS {
            return Err(AggregationError::InvalidRange {
                reason: format!(
                    "{} days requested, at most {} allowed",
                    days, MAX_BACKFILL_DAYS
                ),
            });
        }

        info!(%from, %to, days, "Backfilling daily analytics");
        let mut snapshots = Vec::with_capacity(days as usize);
        for date in from.iter_days().take(days as usize) {
            snapshots.push(self.run_with_timeout(date).await?);
        }
        Ok(snapshots)
    }

    async fn run(
        &self,
        date: NaiveDate,
        budget: Option<Duration>,
    ) -> Result<DailySnapshot, AggregationError> {
        let span = info_span!("daily_aggregation", %date);

        async {
            info!("Aggregating daily analytics");
            match budget {
                Some(budget) => tokio::time::timeout(budget, self.compute_and_write(date))
                    .await
                    .map_err(|_| AggregationError::Timeout { date, budget })?,
                None => self.compute_and_write(date).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn compute_and_write(&self, date: NaiveDate) -> Result<DailySnapshot, AggregationError> {
        let snapshot = self.preview(date).await?;
        self.write(&snapshot).await?;
        info!(
            total_users = snapshot.total_users,
            new_users = snapshot.new_users,
            total_revenue = snapshot.total_revenue,
            total_views = snapshot.total_views,
            "Wrote {}",
            snapshot.document_path()
        );
        Ok(snapshot)
    }

    async fn write(&self, snapshot: &DailySnapshot) -> Result<(), AggregationError> {
        let data = serde_json::to_value(snapshot).map_err(|source| AggregationError::Encode {
            date: snapshot.date,
            source,
        })?;
        self.store
            .put(SNAPSHOT_COLLECTION, &snapshot.document_id(), data)
            .await
            .map_err(|source| AggregationError::Write {
                path: snapshot.document_path(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaymentStatus, RevenueStream};
    use chrono::Duration as ChronoDuration;

    fn window() -> DayWindow {
        DayWindow::for_date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(), chrono_tz::UTC)
    }

    #[test]
    fn test_aggregate_empty_inputs() {
        let w = window();
        let snapshot = aggregate(&w, &AggregationInputs::default(), &AggregationSettings::default());

        assert_eq!(snapshot.date, w.date());
        assert_eq!(snapshot.timestamp, w.start());
        assert_eq!(snapshot.total_users, 0);
        assert_eq!(snapshot.total_revenue, 0.0);
        assert_eq!(snapshot.total_views, 0.0);
        assert_eq!(snapshot.watch_time, 0.0);
        assert_eq!(snapshot.engagement, 0.0);
        assert_eq!(snapshot.avg_rating, 0.0);
        assert_eq!(snapshot.total_ratings, 0);
        assert_eq!(snapshot.avg_watch_time, 45.0);
        assert_eq!(snapshot.completion_rate, 60.0);
    }

    #[test]
    fn test_aggregate_combines_phases() {
        let w = window();
        let midday = w.start() + ChronoDuration::hours(12);
        let inputs = AggregationInputs {
            users: vec![
                UserRecord {
                    created_at: Some(midday),
                    last_login: Some(midday),
                    subscription_status: None,
                },
                UserRecord {
                    created_at: Some(w.start() - ChronoDuration::days(3)),
                    last_login: Some(midday),
                    subscription_status: Some("active".into()),
                },
            ],
            transactions: vec![TransactionRecord {
                created_at: Some(midday),
                status: PaymentStatus::Completed,
                amount: Some(99.0),
                stream: RevenueStream::Ppv,
            }],
            movies: vec![ContentRecord {
                views: Some(30.0),
                rating: Some(5.0),
            }],
            series: vec![ContentRecord {
                views: Some(10.0),
                rating: Some(3.0),
            }],
            short_films: vec![],
            events: vec![ContentRecord {
                views: Some(0.0),
                rating: None,
            }],
        };

        let s = aggregate(&w, &inputs, &AggregationSettings::default());
        assert_eq!(s.total_users, 2);
        assert_eq!(s.new_users, 1);
        assert_eq!(s.active_users, 2);
        assert_eq!(s.premium_users, 1);
        assert_eq!(s.ppv_revenue, 99.0);
        assert_eq!(s.total_views, 40.0);
        assert_eq!(s.watch_time, 1800.0);
        assert_eq!(s.engagement, 2000.0);
        assert_eq!(s.avg_rating, 4.0);
        assert_eq!(s.total_ratings, 2);
    }

    #[test]
    fn test_custom_model_flows_through() {
        let settings = AggregationSettings {
            model: EngagementModel {
                watch_minutes_per_view: 20.0,
                avg_watch_time: 20.0,
                completion_rate: 75.0,
            },
            ..Default::default()
        };
        let inputs = AggregationInputs {
            movies: vec![ContentRecord {
                views: Some(3.0),
                rating: None,
            }],
            ..Default::default()
        };

        let s = aggregate(&window(), &inputs, &settings);
        assert_eq!(s.watch_time, 60.0);
        assert_eq!(s.avg_watch_time, 20.0);
        assert_eq!(s.completion_rate, 75.0);
    }
}
