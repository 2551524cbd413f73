//! PageDriver - the browser seam.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Page objects / assertions                                   │
//! │            │  &Locator                                       │
//! │            ▼                                                 │
//! │  PageDriver (object-safe async trait)                        │
//! │     ├── CdpDriver   real Chromium over DevTools (browser)    │
//! │     └── MockDriver  scriptable in-memory page (tests)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drivers never wait: each call resolves the locator once against the
//! current document. Auto-waiting and retrying live in [`crate::page`] and
//! [`crate::expect`].

use crate::config::{BrowserOptions, Viewport};
use crate::locator::{BoundingBox, Locator};
use crate::result::E2eResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Keyboard keys the suite presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape
    Escape,
    /// Enter
    Enter,
    /// Tab
    Tab,
    /// Backspace
    Backspace,
}

impl Key {
    /// DOM `key` value
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Escape => "Escape",
            Self::Enter => "Enter",
            Self::Tab => "Tab",
            Self::Backspace => "Backspace",
        }
    }

    /// DOM `code` value
    #[must_use]
    pub const fn code(self) -> &'static str {
        self.key()
    }

    /// Windows virtual key code
    #[must_use]
    pub const fn key_code(self) -> i64 {
        match self {
            Self::Escape => 27,
            Self::Enter => 13,
            Self::Tab => 9,
            Self::Backspace => 8,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Single-page browser control used by every page object.
///
/// Element operations act on the first match of the locator.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait for the load event
    async fn goto(&self, url: &str) -> E2eResult<()>;

    /// Current document URL
    async fn current_url(&self) -> E2eResult<String>;

    /// Reload the current document
    async fn reload(&self) -> E2eResult<()>;

    /// Number of matches
    async fn count(&self, locator: &Locator) -> E2eResult<usize>;

    /// First match exists and is rendered with non-zero size
    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool>;

    /// First match is not disabled
    async fn is_enabled(&self, locator: &Locator) -> E2eResult<bool>;

    /// First match is a checked checkbox or radio
    async fn is_checked(&self, locator: &Locator) -> E2eResult<bool>;

    /// Raw `textContent` of the first match
    async fn text_content(&self, locator: &Locator) -> E2eResult<Option<String>>;

    /// `textContent` of every match
    async fn all_text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>>;

    /// Attribute of the first match
    async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>>;

    /// `value` of the first matching input
    async fn input_value(&self, locator: &Locator) -> E2eResult<String>;

    /// Computed style property of the first match
    async fn css_value(&self, locator: &Locator, property: &str) -> E2eResult<String>;

    /// Geometry of the first match
    async fn bounding_box(&self, locator: &Locator) -> E2eResult<Option<BoundingBox>>;

    /// Left click at the centre of the first match
    async fn click(&self, locator: &Locator) -> E2eResult<()>;

    /// Move the mouse over the first match
    async fn hover(&self, locator: &Locator) -> E2eResult<()>;

    /// Replace the value of the first matching input
    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()>;

    /// Type into the first match one character at a time
    async fn type_text(&self, locator: &Locator, text: &str) -> E2eResult<()>;

    /// Set a checkbox or radio regardless of visibility
    async fn set_checked(&self, locator: &Locator, checked: bool) -> E2eResult<()>;

    /// Press and release a key on the focused element
    async fn press_key(&self, key: Key) -> E2eResult<()>;

    /// Left click at viewport coordinates
    async fn mouse_click(&self, x: f64, y: f64) -> E2eResult<()>;

    /// Resize the viewport
    async fn set_viewport(&self, viewport: Viewport) -> E2eResult<()>;

    /// Evaluate a JS expression and return its JSON value
    async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value>;

    /// Auto-accept `confirm`/`alert` dialogs on the current document and
    /// record their messages
    async fn accept_dialogs(&self) -> E2eResult<()>;

    /// Messages of dialogs accepted so far
    async fn dialog_messages(&self) -> E2eResult<Vec<String>>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> E2eResult<Vec<u8>>;

    /// Release the session
    async fn close(&self) -> E2eResult<()>;
}

/// Opens one isolated session per test attempt
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Open a fresh session
    async fn open(&self) -> E2eResult<Arc<dyn PageDriver>>;

    /// Options sessions are launched with
    fn options(&self) -> &BrowserOptions;
}
