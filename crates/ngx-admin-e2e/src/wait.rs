//! Bounded condition waits.
//!
//! Every wait in the suite polls a predicate until it holds or a deadline
//! passes. Fixed sleeps are reserved for negative checks, where the
//! expected outcome is that nothing changes.

use crate::config::{DEFAULT_ACTION_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS};
use crate::result::{E2eError, E2eResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Element states a locator can be waited into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// Present and rendered
    Visible,
    /// Absent or not rendered
    Hidden,
    /// Present in the DOM
    Attached,
    /// Absent from the DOM
    Detached,
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Attached => "attached",
            Self::Detached => "detached",
        };
        f.write_str(name)
    }
}

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ACTION_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Poll `check` until it yields a value.
///
/// The check runs at least once, even with a zero timeout. Errors from the
/// check abort the wait immediately.
pub async fn poll_for<T, F, Fut>(what: &str, options: WaitOptions, mut check: F) -> E2eResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<Option<T>>>,
{
    let deadline = Instant::now() + options.timeout();
    loop {
        if let Some(value) = check().await? {
            return Ok(value);
        }
        if Instant::now() >= deadline {
            tracing::debug!(what, timeout_ms = options.timeout_ms, "wait timed out");
            return Err(E2eError::timeout(what, options.timeout_ms));
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

/// Poll `check` until it returns `true`.
pub async fn poll_until<F, Fut>(what: &str, options: WaitOptions, mut check: F) -> E2eResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<bool>>,
{
    poll_for(what, options, || {
        let fut = check();
        async move { Ok(fut.await?.then_some(())) }
    })
    .await
}
