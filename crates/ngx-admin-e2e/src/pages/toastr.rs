//! Modal & Overlays > Toastr.

use crate::expect::expect;
use crate::locator::{AriaRole, Locator};
use crate::page::Page;
use crate::result::E2eResult;
use tracing::debug;

/// Setting that dismisses a toast on click
pub const HIDE_ON_CLICK: &str = "Hide on click";
/// Setting that suppresses identical toasts
pub const PREVENT_DUPLICATES: &str = "Prevent arising of duplicate toast";

/// Toast configuration form
#[derive(Debug, Clone)]
pub struct ToastrPage {
    page: Page,
}

impl ToastrPage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Settings checkbox labelled `name`
    #[must_use]
    pub fn checkbox(name: &str) -> Locator {
        Locator::role_named(AriaRole::Checkbox, name)
    }

    /// Every settings checkbox
    #[must_use]
    pub fn checkboxes() -> Locator {
        Locator::role(AriaRole::Checkbox)
    }

    /// Set the checkbox labelled `name` and verify it took
    pub async fn set_option(&self, name: &str, checked: bool) -> E2eResult<()> {
        let checkbox = Self::checkbox(name);
        debug!(option = name, checked, "toastr option");
        self.page.set_checked_forced(&checkbox, checked).await?;
        let check = expect(&self.page, &checkbox);
        if checked {
            check.to_be_checked().await
        } else {
            check.not_to_be_checked().await
        }
    }

    /// Check every checkbox in turn; returns how many there were
    pub async fn check_all(&self) -> E2eResult<usize> {
        let total = self.page.count(&Self::checkboxes()).await?;
        for i in 0..total {
            let checkbox = Self::checkboxes().nth(i as i32);
            self.page.set_checked_forced(&checkbox, true).await?;
            expect(&self.page, &checkbox).to_be_checked().await?;
        }
        Ok(total)
    }
}
