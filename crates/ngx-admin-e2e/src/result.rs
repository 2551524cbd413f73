//! Result and error types for the suite.

use thiserror::Error;

/// Result type for suite operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors raised while configuring, driving or asserting against the application
#[derive(Debug, Error)]
pub enum E2eError {
    /// A required environment variable is absent or empty
    #[error("Required environment variable {key} is not defined")]
    MissingEnv {
        /// Variable name
        key: String,
    },

    /// Configuration value could not be interpreted
    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig {
        /// Variable or option name
        key: String,
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Driver-level failure (protocol error, script error, missing element)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait never observed its condition
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// Description of the awaited condition
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Expected and observed UI state differ
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// A collapsible menu group did not report `aria-expanded="true"` after a click
    #[error("Failed to expand group menu item with title \"{title}\".")]
    MenuGroupNotExpanded {
        /// Group title
        title: String,
    },

    /// A menu item does not belong to any configured menu group
    #[error("Menu item \"{item}\" not found in any group")]
    MenuItemNotFound {
        /// Menu item text
        item: String,
    },

    /// Month paging gave up before the calendar showed the target month
    #[error("Calendar never reached \"{expected}\" after {steps} steps (last label \"{last_seen}\")")]
    CalendarNavigation {
        /// Expected month/year label
        expected: String,
        /// Last label read from the calendar
        last_seen: String,
        /// Number of month steps taken
        steps: u32,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl E2eError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(what: impl Into<String>, ms: u64) -> Self {
        Self::Timeout {
            what: what.into(),
            ms,
        }
    }

    /// Whether this error reflects application state rather than plumbing
    #[must_use]
    pub const fn is_test_failure(&self) -> bool {
        matches!(
            self,
            Self::AssertionFailed { .. }
                | Self::Timeout { .. }
                | Self::MenuGroupNotExpanded { .. }
                | Self::MenuItemNotFound { .. }
                | Self::CalendarNavigation { .. }
        )
    }
}
