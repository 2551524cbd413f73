//! Clock abstraction for date-relative scenarios.

use chrono::NaiveDate;

/// Source of "today"
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current local date
    fn today(&self) -> NaiveDate;
}

/// Local system date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Frozen date, for deterministic checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    /// Clock stuck at `year-month-day`; `None` for an invalid date
    #[must_use]
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
