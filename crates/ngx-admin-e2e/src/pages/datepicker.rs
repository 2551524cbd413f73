//! Forms > Datepicker.

use crate::calendar::{
    self, day_label, input_value, navigate_to_month, range_value, target_date, MonthDirection,
    MonthPager,
};
use crate::clock::Clock;
use crate::expect::expect;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::E2eResult;
use crate::wait::poll_until;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// Common and range date pickers
#[derive(Debug, Clone)]
pub struct DatepickerPage {
    page: Page,
    clock: Arc<dyn Clock>,
}

impl DatepickerPage {
    /// Pickers on `page`, with "today" taken from `clock`
    #[must_use]
    pub fn new(page: Page, clock: Arc<dyn Clock>) -> Self {
        Self { page, clock }
    }

    /// Common picker input
    #[must_use]
    pub fn form_picker_input() -> Locator {
        Locator::placeholder("Form Picker")
    }

    /// Range picker input
    #[must_use]
    pub fn range_picker_input() -> Locator {
        Locator::css("input[placeholder=\"Range Picker\"]")
    }

    /// Month/year header of the open calendar
    #[must_use]
    pub fn calendar_label() -> Locator {
        Locator::css("nb-calendar-view-mode")
    }

    /// Pager button for `direction`
    #[must_use]
    pub fn pager_button(direction: MonthDirection) -> Locator {
        let chevron = match direction {
            MonthDirection::Next => "chevron-right",
            MonthDirection::Previous => "chevron-left",
        };
        Locator::css(format!(
            "nb-calendar-pageable-navigation [data-name=\"{chevron}\"]"
        ))
    }

    /// Selectable cell for `date`'s day in the shown month
    #[must_use]
    pub fn day_cell(date: NaiveDate) -> Locator {
        Locator::css(".day-cell.ng-star-inserted:not(.bounding-month)")
            .get_by_exact_text(day_label(date))
    }

    /// Input values settle slower than other widgets.
    const fn input_timeout_ms(&self) -> u64 {
        self.page.timeouts().expect_ms.saturating_mul(2)
    }

    async fn pick(&self, date: NaiveDate) -> E2eResult<u32> {
        let today = self.clock.today();
        let steps =
            navigate_to_month(self, today, date, self.page.timeouts().max_month_steps).await?;
        self.page.click(&Self::day_cell(date)).await?;
        Ok(steps)
    }

    /// Pick today + `days` in the common picker and verify the input.
    /// Returns the number of month pages turned.
    pub async fn select_common_date_from_today(&self, days: i64) -> E2eResult<u32> {
        let input = Self::form_picker_input();
        let date = target_date(self.clock.today(), days);
        info!(%date, "select date");

        self.page.click(&input).await?;
        let steps = self.pick(date).await?;

        let check = expect(&self.page, &input).with_timeout(self.input_timeout_ms());
        check.not_to_have_value("").await?;
        check.to_have_value(&input_value(date)).await?;
        Ok(steps)
    }

    /// Pick today + `start`..today + `end` in the range picker and verify
    /// the input. Returns the total number of month pages turned.
    pub async fn select_range_from_today(&self, start: i64, end: i64) -> E2eResult<u32> {
        let input = Self::range_picker_input();
        let today = self.clock.today();
        let (from, to) = (target_date(today, start), target_date(today, end));
        info!(%from, %to, "select range");

        self.page.click(&input).await?;
        let steps = self.pick(from).await? + self.pick(to).await?;

        expect(&self.page, &input)
            .with_timeout(self.input_timeout_ms())
            .to_have_value(&range_value(from, to))
            .await?;
        Ok(steps)
    }
}

#[async_trait]
impl MonthPager for DatepickerPage {
    async fn label(&self) -> E2eResult<String> {
        self.page.text(&Self::calendar_label()).await
    }

    /// Clicks the pager and waits for the header to change.
    async fn step(&self, direction: MonthDirection) -> E2eResult<()> {
        let header = Self::calendar_label();
        let before = self.page.text(&header).await?;
        self.page.click(&Self::pager_button(direction)).await?;
        let what = format!("{header} to leave \"{before}\"");
        poll_until(&what, self.page.action_wait(), || {
            let (page, header, before) = (&self.page, &header, &before);
            async move { Ok(page.text(header).await? != *before) }
        })
        .await
    }
}

/// Months the calendar must page from `today` to show `date`
#[must_use]
pub fn pages_needed(today: NaiveDate, date: NaiveDate) -> u32 {
    calendar::months_between(today, date).unsigned_abs()
}
