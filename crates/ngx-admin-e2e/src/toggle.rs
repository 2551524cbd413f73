//! Two-state status cards.
//!
//! A status card pairs a clickable icon with a status label reading `ON`
//! or `OFF`. Switching reads the current state, clicks once, and asserts
//! the label flipped; it never assumes the click worked.

use crate::expect::expect;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::E2eResult;
use tracing::debug;

/// Label of the on state
pub const ON: &str = "ON";
/// Label of the off state
pub const OFF: &str = "OFF";

/// Label for a boolean state
#[must_use]
pub const fn label(on: bool) -> &'static str {
    if on {
        ON
    } else {
        OFF
    }
}

/// Icon plus status label of one toggleable card
#[derive(Debug, Clone)]
pub struct StatusToggle {
    page: Page,
    name: String,
    icon: Locator,
    status: Locator,
}

impl StatusToggle {
    /// Toggle clicked through `icon`, reporting through `status`
    #[must_use]
    pub fn new(page: Page, name: impl Into<String>, icon: Locator, status: Locator) -> Self {
        Self {
            page,
            name: name.into(),
            icon,
            status,
        }
    }

    /// Clickable icon
    #[must_use]
    pub const fn icon(&self) -> &Locator {
        &self.icon
    }

    /// Status label
    #[must_use]
    pub const fn status(&self) -> &Locator {
        &self.status
    }

    /// Whether the label currently reads `ON`
    pub async fn is_on(&self) -> E2eResult<bool> {
        Ok(self.page.text(&self.status).await? == ON)
    }

    /// Flip the state and verify the label followed; returns the new state.
    pub async fn switch(&self) -> E2eResult<bool> {
        let was_on = self.is_on().await?;
        let want = !was_on;
        debug!(toggle = %self.name, from = label(was_on), to = label(want), "switch");
        self.page.click(&self.icon).await?;
        expect(&self.page, &self.status).to_have_text(label(want)).await?;
        Ok(want)
    }

    /// Switch until the state equals `on`; no click when already there.
    pub async fn ensure(&self, on: bool) -> E2eResult<()> {
        if self.is_on().await? != on {
            self.switch().await?;
        }
        Ok(())
    }
}
