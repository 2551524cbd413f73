//! Tables & Data > Smart Table.
//!
//! The grid shares one server-side dataset across sessions, so edits and
//! deletes target rows by value. Scenarios that mutate it should not run
//! against the same rows concurrently.

use crate::expect::expect;
use crate::locator::{AriaRole, Locator};
use crate::page::Page;
use crate::result::{E2eError, E2eResult};
use crate::wait::{poll_for, poll_until};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

/// Native confirm shown before deleting a row
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete?";
/// Indicator rendered by an empty filter result
pub const NO_DATA: &str = "No data found";
/// Age filter value that matches no row of the demo dataset
pub const NO_MATCH_AGE: &str = "200";

/// What an age filter left in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeFilterOutcome {
    /// This many rows, every one showing the filtered age
    Rows(usize),
    /// The "No data found" indicator
    NoData,
}

/// The smart table grid
#[derive(Debug, Clone)]
pub struct SmartTablePage {
    page: Page,
}

impl SmartTablePage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// The grid
    #[must_use]
    pub fn table() -> Locator {
        Locator::role(AriaRole::Table)
    }

    /// Rows containing `text`
    #[must_use]
    pub fn row_with(text: &str) -> Locator {
        Self::table().locator("tr").filter_has_text(text)
    }

    /// Row whose id column reads `id`
    #[must_use]
    pub fn row_by_id(id: &str) -> Locator {
        Locator::role_named(AriaRole::Row, id)
            .filter_has(Locator::css("td").nth(1).get_by_exact_text(id))
    }

    /// Age column filter
    #[must_use]
    pub fn age_filter() -> Locator {
        Locator::css("input-filter").get_by_placeholder("Age")
    }

    /// Inline editor input with `placeholder`
    #[must_use]
    pub fn editor(placeholder: &str) -> Locator {
        Locator::css("input-editor").get_by_placeholder(placeholder)
    }

    /// Confirm button of the inline editor
    #[must_use]
    pub fn confirm_edit() -> Locator {
        Locator::css(".nb-checkmark")
    }

    /// Pager link for `page_number`
    #[must_use]
    pub fn pager_link(page_number: &str) -> Locator {
        Locator::css(".ng2-smart-pagination-nav").get_by_exact_text(page_number)
    }

    /// Last cell of every body row
    #[must_use]
    pub fn age_cells() -> Locator {
        Locator::css("tbody tr").locator("td:last-child")
    }

    /// Empty-result indicator
    #[must_use]
    pub fn no_data() -> Locator {
        Self::table().get_by_text(NO_DATA)
    }

    /// Delete the row containing `email`, accepting the confirmation
    pub async fn delete_row(&self, email: &str) -> E2eResult<()> {
        info!(email, "delete row");
        self.page.accept_dialogs().await?;
        self.page
            .click(&Self::row_with(email).locator(".nb-trash"))
            .await?;

        let page = &self.page;
        let messages = poll_for("delete confirmation", page.action_wait(), || async move {
            let seen = page.dialog_messages().await?;
            Ok((!seen.is_empty()).then_some(seen))
        })
        .await?;
        match messages.last() {
            Some(m) if m == DELETE_CONFIRMATION => Ok(()),
            other => Err(E2eError::assertion(format!(
                "expected confirmation \"{DELETE_CONFIRMATION}\", got {other:?}"
            ))),
        }
    }

    /// No row contains `email` any more
    pub async fn verify_row_deleted(&self, email: &str) -> E2eResult<()> {
        expect(&self.page, &Self::row_with(email)).to_have_count(0).await
    }

    async fn edit_cell(&self, row: Locator, placeholder: &str, value: &str) -> E2eResult<()> {
        self.page.click(&row.locator(".nb-edit")).await?;
        let editor = Self::editor(placeholder);
        self.page.clear(&editor).await?;
        self.page.fill(&editor, value).await?;
        self.page.click(&Self::confirm_edit()).await
    }

    /// Set the age of the first row containing `email`
    pub async fn edit_age(&self, email: &str, age: &str) -> E2eResult<()> {
        info!(email, age, "edit age");
        self.edit_cell(Self::row_with(email).first(), "Age", age).await
    }

    /// Jump to pager page `page_number`
    pub async fn navigate_to_page(&self, page_number: &str) -> E2eResult<()> {
        debug!(page_number, "paginate");
        self.page.click(&Self::pager_link(page_number)).await
    }

    /// Set the e-mail of the row with `id`
    pub async fn edit_email_by_id(&self, id: &str, email: &str) -> E2eResult<()> {
        info!(id, email, "edit email");
        self.edit_cell(Self::row_by_id(id), "E-mail", email).await
    }

    /// The row with `id` shows `email`
    pub async fn verify_email_by_id(&self, id: &str, email: &str) -> E2eResult<()> {
        let cell = Self::row_by_id(id).locator("td").nth(5);
        expect(&self.page, &cell).to_have_text(email).await
    }

    /// Type `age` into the age filter and wait until the input holds it.
    ///
    /// The grid applies the filter after a debounce; this does not wait for
    /// the rows to change. Use [`Self::verify_age_filter`] for that.
    pub async fn filter_by_age(&self, age: &str) -> E2eResult<()> {
        info!(age, "filter by age");
        let filter = Self::age_filter();
        self.page.clear(&filter).await?;
        self.page.fill(&filter, age).await?;
        let (page, filter) = (&self.page, &filter);
        poll_until("age filter to apply", page.action_wait(), || async move {
            Ok(page.input_value(filter).await? == age)
        })
        .await
    }

    /// Check the grid after filtering by `age`.
    ///
    /// Passes when every row shows `age` and no indicator is rendered, or
    /// when the grid shows exactly one "No data found" indicator and no
    /// data rows. An empty grid without the indicator fails, as does an
    /// indicator next to stale rows. [`NO_MATCH_AGE`] must yield the
    /// indicator.
    pub async fn verify_age_filter(&self, age: &str) -> E2eResult<AgeFilterOutcome> {
        let deadline = Instant::now() + self.page.expect_wait().timeout();
        let outcome = loop {
            let indicators = self.page.count(&Self::no_data()).await?;
            // the indicator renders as a body row of its own
            let cells: Vec<String> = self
                .page
                .all_texts(&Self::age_cells())
                .await?
                .into_iter()
                .filter(|c| c.trim() != NO_DATA)
                .collect();
            if indicators == 1 && cells.is_empty() {
                break AgeFilterOutcome::NoData;
            }
            if indicators == 0 && !cells.is_empty() && cells.iter().all(|c| c == age) {
                break AgeFilterOutcome::Rows(cells.len());
            }
            if Instant::now() >= deadline {
                return Err(E2eError::assertion(format!(
                    "age filter {age}: expected every row to show {age} or a single \"{NO_DATA}\" \
                     with no rows, got {indicators} indicator(s) and rows {cells:?}"
                )));
            }
            tokio::time::sleep(self.page.timeouts().poll_interval()).await;
        };

        if age == NO_MATCH_AGE && outcome != AgeFilterOutcome::NoData {
            return Err(E2eError::assertion(format!(
                "age filter {age}: expected \"{NO_DATA}\", got {outcome:?}"
            )));
        }
        debug!(age, ?outcome, "age filter verified");
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    fn setup() -> (Arc<MockDriver>, SmartTablePage) {
        let mock = Arc::new(MockDriver::new());
        let page = Page::new(mock.clone(), "http://app", Timeouts::fast());
        (mock, SmartTablePage::new(page))
    }

    mod delete_tests {
        use super::*;

        fn deletable(mock: &MockDriver, email: &str, message: &'static str) {
            let row = SmartTablePage::row_with(email);
            let trash = row.clone().locator(".nb-trash");
            mock.set_element(&row, MockElement::visible().with_text(email));
            mock.set_element(&trash, MockElement::visible());
            mock.on_click(&trash, move |s| {
                if s.raise_dialog(message) {
                    s.remove_element(&row);
                }
            });
        }

        #[tokio::test]
        async fn test_delete_accepts_confirmation() {
            let (mock, table) = setup();
            deletable(&mock, "fat@yandex.ru", DELETE_CONFIRMATION);

            table.delete_row("fat@yandex.ru").await.unwrap();
            table.verify_row_deleted("fat@yandex.ru").await.unwrap();
            assert_eq!(mock.with_state(|s| s.dialogs.clone()), vec![DELETE_CONFIRMATION]);
        }

        #[tokio::test]
        async fn test_unexpected_confirmation_text_fails() {
            let (mock, table) = setup();
            deletable(&mock, "x@y.z", "Delete?");
            let err = table.delete_row("x@y.z").await.unwrap_err();
            assert!(matches!(err, E2eError::AssertionFailed { .. }));
        }

        #[tokio::test]
        async fn test_row_still_present_fails_verification() {
            let (mock, table) = setup();
            mock.set_element(&SmartTablePage::row_with("a@b.c"), MockElement::visible());
            assert!(table.verify_row_deleted("a@b.c").await.is_err());
        }
    }

    mod edit_tests {
        use super::*;

        #[tokio::test]
        async fn test_edit_age_uses_inline_editor() {
            let (mock, table) = setup();
            let edit = SmartTablePage::row_with("mdo@gmail.com").first().locator(".nb-edit");
            let editor = SmartTablePage::editor("Age");
            mock.set_element(&edit, MockElement::visible());
            mock.set_element(&editor, MockElement::visible().with_value("28"));
            mock.set_element(&SmartTablePage::confirm_edit(), MockElement::visible());

            table.edit_age("mdo@gmail.com", "35").await.unwrap();
            assert_eq!(mock.element(&editor).unwrap().value, "35");
            assert_eq!(mock.clicks(&SmartTablePage::confirm_edit()), 1);
        }

        #[tokio::test]
        async fn test_edit_and_verify_email_by_id() {
            let (mock, table) = setup();
            let row = SmartTablePage::row_by_id("11");
            let editor = SmartTablePage::editor("E-mail");
            let cell = row.clone().locator("td").nth(5);
            mock.set_element(&row.clone().locator(".nb-edit"), MockElement::visible());
            mock.set_element(&editor, MockElement::visible());
            mock.set_element(&SmartTablePage::pager_link("2"), MockElement::visible());
            mock.set_element(&cell, MockElement::visible().with_text("old@mail.com"));
            let (e, c) = (editor.clone(), cell.clone());
            mock.on_click(&SmartTablePage::confirm_edit(), move |s| {
                let value = s.element(&e).map(|el| el.value.clone()).unwrap_or_default();
                s.element_mut(&c).text = Some(value);
            });
            mock.set_element(&SmartTablePage::confirm_edit(), MockElement::visible());

            table.navigate_to_page("2").await.unwrap();
            table.edit_email_by_id("11", "qa@example.com").await.unwrap();
            table.verify_email_by_id("11", "qa@example.com").await.unwrap();
        }
    }

    mod filter_tests {
        use super::*;

        #[tokio::test]
        async fn test_matching_rows() {
            let (mock, table) = setup();
            mock.set_element(&SmartTablePage::age_filter(), MockElement::visible());
            mock.set_element(
                &SmartTablePage::age_cells(),
                MockElement::visible().with_texts(["20", "20", "20"]),
            );
            table.filter_by_age("20").await.unwrap();
            assert_eq!(
                table.verify_age_filter("20").await.unwrap(),
                AgeFilterOutcome::Rows(3)
            );
        }

        #[tokio::test]
        async fn test_filter_waits_on_input_only() {
            let (mock, table) = setup();
            let filter = SmartTablePage::age_filter();
            mock.set_element(&filter, MockElement::visible().with_value("99"));
            table.filter_by_age("40").await.unwrap();
            assert_eq!(mock.element(&filter).unwrap().value, "40");
            assert!(mock.element(&SmartTablePage::age_cells()).is_none());
        }

        #[tokio::test]
        async fn test_no_match_age_yields_no_data() {
            let (mock, table) = setup();
            mock.set_element(&SmartTablePage::no_data(), MockElement::visible().with_text(NO_DATA));
            assert_eq!(
                table.verify_age_filter(NO_MATCH_AGE).await.unwrap(),
                AgeFilterOutcome::NoData
            );
        }

        #[tokio::test]
        async fn test_empty_grid_without_indicator_fails() {
            let (_mock, table) = setup();
            let err = table.verify_age_filter(NO_MATCH_AGE).await.unwrap_err();
            assert!(matches!(err, E2eError::AssertionFailed { .. }));
            assert!(err.to_string().contains("No data found"));
        }

        #[tokio::test]
        async fn test_indicator_with_stale_rows_fails() {
            let (mock, table) = setup();
            mock.set_element(&SmartTablePage::no_data(), MockElement::visible().with_text(NO_DATA));
            mock.set_element(
                &SmartTablePage::age_cells(),
                MockElement::visible().with_texts(["35", "28"]),
            );
            let err = table.verify_age_filter(NO_MATCH_AGE).await.unwrap_err();
            assert!(matches!(err, E2eError::AssertionFailed { .. }));
            assert!(err.to_string().contains("\"35\""));
        }

        #[tokio::test]
        async fn test_duplicate_indicators_fail() {
            let (mock, table) = setup();
            mock.set_element(
                &SmartTablePage::no_data(),
                MockElement::visible().with_texts([NO_DATA, NO_DATA]),
            );
            let err = table.verify_age_filter(NO_MATCH_AGE).await.unwrap_err();
            assert!(err.to_string().contains("2 indicator(s)"));
        }

        #[tokio::test]
        async fn test_indicator_cell_is_not_a_data_row() {
            let (mock, table) = setup();
            mock.set_element(&SmartTablePage::no_data(), MockElement::visible().with_text(NO_DATA));
            mock.set_element(&SmartTablePage::age_cells(), MockElement::visible().with_text(NO_DATA));
            assert_eq!(
                table.verify_age_filter(NO_MATCH_AGE).await.unwrap(),
                AgeFilterOutcome::NoData
            );
        }

        #[tokio::test]
        async fn test_mismatching_row_fails() {
            let (mock, table) = setup();
            mock.set_element(
                &SmartTablePage::age_cells(),
                MockElement::visible().with_texts(["30", "31"]),
            );
            let err = table.verify_age_filter("30").await.unwrap_err();
            assert!(err.to_string().contains("\"31\""));
        }
    }
}
