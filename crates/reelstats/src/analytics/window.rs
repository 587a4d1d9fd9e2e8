//! Calendar-day boundaries in the deployment time zone.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Source of "now". Injected so the target day can be pinned in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// One local calendar day as an inclusive UTC interval with millisecond
/// resolution: `[00:00:00.000, 23:59:59.999]` on ordinary days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    date: NaiveDate,
    tz: Tz,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate, tz: Tz) -> Self {
        let start = local_day_start(date, tz);
        let next_start = date
            .succ_opt()
            .map(|next| local_day_start(next, tz))
            .unwrap_or_else(|| start + Duration::days(1));

        Self {
            date,
            tz,
            start,
            end: next_start - Duration::milliseconds(1),
        }
    }

    /// The window for the local day before `now`.
    pub fn yesterday(now: DateTime<Utc>, tz: Tz) -> Self {
        Self::for_date(yesterday(now, tz), tz)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive at both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Lower bound of the trailing activity window: the local start of the
    /// calendar day `days` before this one. The upper bound is `end()`.
    pub fn active_since(&self, days: u32) -> DateTime<Utc> {
        self.date
            .checked_sub_days(Days::new(u64::from(days)))
            .map(|from| local_day_start(from, self.tz))
            .unwrap_or(self.start)
    }
}

/// The local calendar date before the one `now` falls on in `tz`.
pub fn yesterday(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    let today = now.with_timezone(&tz).date_naive();
    today.pred_opt().unwrap_or(today)
}

/// First valid local instant of `date`. Midnight normally; where a DST
/// transition skips midnight, the first instant after the gap.
fn local_day_start(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=8)
        .map(|step| midnight + Duration::minutes(15 * step))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
