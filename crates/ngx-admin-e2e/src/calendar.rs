//! Calendar arithmetic and bounded month paging.
//!
//! Selecting "N days from today" in a month-view calendar means paging
//! next/previous until the month label shows the target month, then
//! clicking the day. The direction is fixed up front by comparing the
//! target with today, and paging gives up with
//! [`E2eError::CalendarNavigation`] after a configured number of steps
//! instead of looping forever when the label never matches.

use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

/// Paging direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthDirection {
    /// Forward in time
    Next,
    /// Backward in time
    Previous,
}

/// `today + offset_days`
#[must_use]
pub fn target_date(today: NaiveDate, offset_days: i64) -> NaiveDate {
    today + Duration::days(offset_days)
}

/// Signed number of calendar months from `from` to `to`
#[must_use]
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Direction to page from `today` towards `target`
#[must_use]
pub fn direction(today: NaiveDate, target: NaiveDate) -> MonthDirection {
    if target > today {
        MonthDirection::Next
    } else {
        MonthDirection::Previous
    }
}

/// Calendar header label, e.g. "April 2026"
#[must_use]
pub fn month_year_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Picker input value, e.g. "Apr 7, 2026"
#[must_use]
pub fn input_value(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Range picker input value, e.g. "Apr 3, 2026 - Apr 5, 2026"
#[must_use]
pub fn range_value(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", input_value(start), input_value(end))
}

/// Day-of-month cell text
#[must_use]
pub fn day_label(date: NaiveDate) -> String {
    date.day().to_string()
}

/// A month-view calendar that can be read and paged
#[async_trait]
pub trait MonthPager: Send + Sync {
    /// Current month/year header text
    async fn label(&self) -> E2eResult<String>;

    /// Page one month in `direction`.
    ///
    /// A header that never changes should surface as
    /// [`E2eError::Timeout`]; [`navigate_to_month`] reports it as
    /// [`E2eError::CalendarNavigation`].
    async fn step(&self, direction: MonthDirection) -> E2eResult<()>;
}

/// Page until the header shows `target`'s month; returns the steps taken.
pub async fn navigate_to_month<P>(
    pager: &P,
    today: NaiveDate,
    target: NaiveDate,
    max_steps: u32,
) -> E2eResult<u32>
where
    P: MonthPager + ?Sized,
{
    let expected = month_year_label(target);
    let dir = direction(today, target);
    let mut steps = 0;
    loop {
        let label = pager.label().await?;
        if label.contains(&expected) {
            debug!(%expected, steps, "calendar on target month");
            return Ok(steps);
        }
        if steps >= max_steps {
            return Err(E2eError::CalendarNavigation {
                expected,
                last_seen: label,
                steps,
            });
        }
        match pager.step(dir).await {
            Ok(()) => steps += 1,
            Err(E2eError::Timeout { what, ms }) => {
                debug!(%what, ms, steps, "calendar header stopped changing");
                return Err(E2eError::CalendarNavigation {
                    expected,
                    last_seen: label,
                    steps,
                });
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Calendar widget whose header follows its paging
    #[derive(Debug)]
    struct FakeCalendar {
        shown: Mutex<NaiveDate>,
        steps: Mutex<Vec<MonthDirection>>,
        stuck: bool,
        frozen_after: Option<usize>,
    }

    impl FakeCalendar {
        fn showing(date: NaiveDate) -> Self {
            Self {
                shown: Mutex::new(date.with_day(1).unwrap()),
                steps: Mutex::new(Vec::new()),
                stuck: false,
                frozen_after: None,
            }
        }
    }

    #[async_trait]
    impl MonthPager for FakeCalendar {
        async fn label(&self) -> E2eResult<String> {
            Ok(format!(" {} ", month_year_label(*self.shown.lock().unwrap())))
        }

        async fn step(&self, direction: MonthDirection) -> E2eResult<()> {
            let taken = {
                let mut steps = self.steps.lock().unwrap();
                steps.push(direction);
                steps.len()
            };
            if self.frozen_after.is_some_and(|n| taken > n) {
                return Err(E2eError::timeout("calendar header to change", 50));
            }
            if self.stuck {
                return Ok(());
            }
            let mut shown = self.shown.lock().unwrap();
            *shown = match direction {
                MonthDirection::Next => shown.checked_add_months(chrono::Months::new(1)).unwrap(),
                MonthDirection::Previous => shown.checked_sub_months(chrono::Months::new(1)).unwrap(),
            };
            Ok(())
        }
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_labels() {
            let d = date(2026, 4, 7);
            assert_eq!(month_year_label(d), "April 2026");
            assert_eq!(input_value(d), "Apr 7, 2026");
            assert_eq!(day_label(d), "7");
        }

        #[test]
        fn test_range_value_from_fixed_today() {
            let today = date(2026, 10, 16);
            let start = target_date(today, 3);
            let end = target_date(today, 5);
            assert_eq!(range_value(start, end), "Oct 19, 2026 - Oct 21, 2026");
        }

        #[test]
        fn test_range_across_year_end() {
            let today = date(2026, 12, 29);
            assert_eq!(
                range_value(target_date(today, 3), target_date(today, 5)),
                "Jan 1, 2027 - Jan 3, 2027"
            );
        }

        #[test]
        fn test_months_between() {
            assert_eq!(months_between(date(2026, 1, 31), date(2026, 2, 1)), 1);
            assert_eq!(months_between(date(2026, 12, 1), date(2027, 1, 1)), 1);
            assert_eq!(months_between(date(2026, 3, 1), date(2025, 11, 30)), -4);
            assert_eq!(months_between(date(2026, 3, 1), date(2026, 3, 31)), 0);
        }

        #[test]
        fn test_direction() {
            let today = date(2026, 5, 5);
            assert_eq!(direction(today, date(2026, 5, 6)), MonthDirection::Next);
            assert_eq!(direction(today, today), MonthDirection::Previous);
            assert_eq!(direction(today, date(2026, 4, 1)), MonthDirection::Previous);
        }
    }

    mod paging_tests {
        use super::*;

        #[tokio::test]
        async fn test_same_month_takes_no_steps() {
            let today = date(2026, 6, 1);
            let cal = FakeCalendar::showing(today);
            let steps = navigate_to_month(&cal, today, target_date(today, 7), 10)
                .await
                .unwrap();
            assert_eq!(steps, 0);
        }

        #[tokio::test]
        async fn test_pages_backwards_for_past_dates() {
            let today = date(2026, 6, 15);
            let cal = FakeCalendar::showing(today);
            let steps = navigate_to_month(&cal, today, target_date(today, -80), 10)
                .await
                .unwrap();
            assert_eq!(target_date(today, -80), date(2026, 3, 27));
            assert_eq!(steps, 3);
            assert!(cal.steps.lock().unwrap().iter().all(|d| *d == MonthDirection::Previous));
        }

        #[tokio::test]
        async fn test_stuck_calendar_fails_after_bound() {
            let today = date(2026, 6, 15);
            let cal = FakeCalendar {
                stuck: true,
                ..FakeCalendar::showing(today)
            };
            let err = navigate_to_month(&cal, today, target_date(today, 40), 5)
                .await
                .unwrap_err();
            match err {
                E2eError::CalendarNavigation {
                    expected,
                    last_seen,
                    steps,
                } => {
                    assert_eq!(expected, "July 2026");
                    assert!(last_seen.contains("June 2026"));
                    assert_eq!(steps, 5);
                }
                other => panic!("unexpected error {other:?}"),
            }
            assert_eq!(cal.steps.lock().unwrap().len(), 5);
        }

        #[tokio::test]
        async fn test_frozen_header_reports_calendar_navigation() {
            let today = date(2026, 6, 15);
            let cal = FakeCalendar {
                frozen_after: Some(2),
                ..FakeCalendar::showing(today)
            };
            let err = navigate_to_month(&cal, today, target_date(today, 200), 12)
                .await
                .unwrap_err();
            match err {
                E2eError::CalendarNavigation {
                    expected,
                    last_seen,
                    steps,
                } => {
                    assert_eq!(expected, "January 2027");
                    assert!(last_seen.contains("August 2026"));
                    assert_eq!(steps, 2);
                }
                other => panic!("unexpected error {other:?}"),
            }
            assert_eq!(cal.steps.lock().unwrap().len(), 3);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_target_date_adds_days(y in 2000i32..2100, ordinal in 1u32..365, n in 0i64..2000) {
            let today = NaiveDate::from_yo_opt(y, ordinal).unwrap();
            let target = target_date(today, n);
            prop_assert_eq!((target - today).num_days(), n);
        }

        #[test]
        fn prop_steps_equal_month_distance(y in 2000i32..2100, ordinal in 1u32..365, n in 0i64..1500) {
            let today = NaiveDate::from_yo_opt(y, ordinal).unwrap();
            let target = target_date(today, n);
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let cal = FakeCalendar::showing(today);
            let steps = rt.block_on(navigate_to_month(&cal, today, target, 120)).unwrap();
            prop_assert_eq!(i64::from(steps), i64::from(months_between(today, target).abs()));
        }
    }
}
