//! Page context shared by page objects.
//!
//! `Page` pairs a driver session with the application base URL and the
//! timeouts in force. Cloning is cheap; every page object of a session
//! holds its own clone. Actions auto-wait for their target to become
//! visible before touching it.

use crate::config::{Timeouts, Viewport};
use crate::driver::{Key, PageDriver};
use crate::locator::{BoundingBox, Locator};
use crate::result::{E2eError, E2eResult};
use crate::wait::{poll_until, ElementState, WaitOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Collapse runs of whitespace and trim, the way rendered text reads.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Driver session plus suite settings
#[derive(Clone)]
pub struct Page {
    driver: Arc<dyn PageDriver>,
    base_url: String,
    timeouts: Timeouts,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Wrap a driver session
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, base_url: impl Into<String>, timeouts: Timeouts) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            driver,
            base_url,
            timeouts,
        }
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    /// Application root URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeouts in force
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Wait options for actions
    #[must_use]
    pub const fn action_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.timeouts.action_ms,
            poll_interval_ms: self.timeouts.poll_interval_ms,
        }
    }

    /// Wait options for assertions
    #[must_use]
    pub const fn expect_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.timeouts.expect_ms,
            poll_interval_ms: self.timeouts.poll_interval_ms,
        }
    }

    /// Absolute URL for `path`; absolute inputs pass through.
    #[must_use]
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("about:") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Navigate to an absolute URL or a path under the base URL
    pub async fn goto(&self, path: &str) -> E2eResult<()> {
        let url = self.resolve_url(path);
        debug!(%url, "goto");
        let nav = self.driver.goto(&url);
        match tokio::time::timeout(Duration::from_millis(self.timeouts.navigation_ms), nav).await {
            Ok(result) => result,
            Err(_) => Err(E2eError::Navigation {
                url,
                message: format!("no load event within {}ms", self.timeouts.navigation_ms),
            }),
        }
    }

    /// Current URL
    pub async fn url(&self) -> E2eResult<String> {
        self.driver.current_url().await
    }

    /// Reload the document
    pub async fn reload(&self) -> E2eResult<()> {
        debug!("reload");
        self.driver.reload().await
    }

    /// Wait until `locator` reaches `state`
    pub async fn wait_for(&self, locator: &Locator, state: ElementState) -> E2eResult<()> {
        self.wait_for_with(locator, state, self.action_wait()).await
    }

    /// Wait until `locator` reaches `state` with explicit options
    pub async fn wait_for_with(
        &self,
        locator: &Locator,
        state: ElementState,
        options: WaitOptions,
    ) -> E2eResult<()> {
        let what = format!("{locator} to be {state}");
        poll_until(&what, options, || self.in_state(locator, state)).await
    }

    async fn in_state(&self, locator: &Locator, state: ElementState) -> E2eResult<bool> {
        match state {
            ElementState::Visible => self.driver.is_visible(locator).await,
            ElementState::Hidden => Ok(!self.driver.is_visible(locator).await?),
            ElementState::Attached => Ok(self.driver.count(locator).await? > 0),
            ElementState::Detached => Ok(self.driver.count(locator).await? == 0),
        }
    }

    /// Click once visible
    pub async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.wait_for(locator, ElementState::Visible).await?;
        debug!(%locator, "click");
        self.driver.click(locator).await
    }

    /// Hover once visible
    pub async fn hover(&self, locator: &Locator) -> E2eResult<()> {
        self.wait_for(locator, ElementState::Visible).await?;
        debug!(%locator, "hover");
        self.driver.hover(locator).await
    }

    /// Replace an input's value once visible
    pub async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.wait_for(locator, ElementState::Visible).await?;
        debug!(%locator, "fill");
        self.driver.fill(locator, value).await
    }

    /// Empty an input once visible
    pub async fn clear(&self, locator: &Locator) -> E2eResult<()> {
        self.fill(locator, "").await
    }

    /// Type character by character once visible
    pub async fn type_text(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        self.wait_for(locator, ElementState::Visible).await?;
        debug!(%locator, "type");
        self.driver.type_text(locator, text).await
    }

    /// Set a checkbox or radio that may be visually hidden behind a
    /// styled label; waits only for it to be attached.
    pub async fn set_checked_forced(&self, locator: &Locator, checked: bool) -> E2eResult<()> {
        self.wait_for(locator, ElementState::Attached).await?;
        debug!(%locator, checked, "set checked");
        self.driver.set_checked(locator, checked).await
    }

    /// Press a key on the focused element
    pub async fn press(&self, key: Key) -> E2eResult<()> {
        debug!(%key, "press");
        self.driver.press_key(key).await
    }

    /// Left click at viewport coordinates
    pub async fn mouse_click(&self, x: f64, y: f64) -> E2eResult<()> {
        debug!(x, y, "mouse click");
        self.driver.mouse_click(x, y).await
    }

    /// Resize the viewport
    pub async fn set_viewport(&self, viewport: Viewport) -> E2eResult<()> {
        self.driver.set_viewport(viewport).await
    }

    /// Evaluate a JS expression
    pub async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
        self.driver.evaluate(script).await
    }

    /// Match count, without waiting
    pub async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        self.driver.count(locator).await
    }

    /// Visibility, without waiting
    pub async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        self.driver.is_visible(locator).await
    }

    /// Checked state, once attached
    pub async fn is_checked(&self, locator: &Locator) -> E2eResult<bool> {
        self.wait_for(locator, ElementState::Attached).await?;
        self.driver.is_checked(locator).await
    }

    /// Normalized text of the first match, once visible
    pub async fn text(&self, locator: &Locator) -> E2eResult<String> {
        self.wait_for(locator, ElementState::Visible).await?;
        let raw = self.driver.text_content(locator).await?;
        Ok(raw.as_deref().map(normalize_text).unwrap_or_default())
    }

    /// Normalized text of every match, without waiting
    pub async fn all_texts(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        let raw = self.driver.all_text_contents(locator).await?;
        Ok(raw.iter().map(|t| normalize_text(t)).collect())
    }

    /// Attribute of the first match, once visible
    pub async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        self.wait_for(locator, ElementState::Visible).await?;
        self.driver.attribute(locator, name).await
    }

    /// Input value, once visible
    pub async fn input_value(&self, locator: &Locator) -> E2eResult<String> {
        self.wait_for(locator, ElementState::Visible).await?;
        self.driver.input_value(locator).await
    }

    /// Geometry, once visible
    pub async fn bounding_box(&self, locator: &Locator) -> E2eResult<Option<BoundingBox>> {
        self.wait_for(locator, ElementState::Visible).await?;
        self.driver.bounding_box(locator).await
    }

    /// Auto-accept native dialogs on the current document
    pub async fn accept_dialogs(&self) -> E2eResult<()> {
        self.driver.accept_dialogs().await
    }

    /// Messages of accepted dialogs
    pub async fn dialog_messages(&self) -> E2eResult<Vec<String>> {
        self.driver.dialog_messages().await
    }

    /// PNG screenshot
    pub async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        self.driver.screenshot().await
    }

    /// Let animations run before a negative check.
    pub async fn settle(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
