//! Timeouts, browser options and run configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default wait before an action gives up on its target (5 seconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 5_000;
/// Default retry window for assertions (5 seconds)
pub const DEFAULT_EXPECT_TIMEOUT_MS: u64 = 5_000;
/// Default page load timeout (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;
/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
/// Window given to a menu group to report itself expanded
pub const DEFAULT_MENU_EXPANSION_MS: u64 = 500;
/// Upper bound on month steps while paging a calendar
pub const DEFAULT_MAX_MONTH_STEPS: u32 = 120;

/// Timeouts applied by the page context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Wait for an action's target to become actionable
    pub action_ms: u64,
    /// Retry window for assertions
    pub expect_ms: u64,
    /// Page load timeout
    pub navigation_ms: u64,
    /// Polling interval shared by waits and assertions
    pub poll_interval_ms: u64,
    /// Menu group expansion window
    pub menu_expansion_ms: u64,
    /// Calendar paging bound
    pub max_month_steps: u32,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: DEFAULT_ACTION_TIMEOUT_MS,
            expect_ms: DEFAULT_EXPECT_TIMEOUT_MS,
            navigation_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            menu_expansion_ms: DEFAULT_MENU_EXPANSION_MS,
            max_month_steps: DEFAULT_MAX_MONTH_STEPS,
        }
    }
}

impl Timeouts {
    /// Short timeouts for in-memory pages
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            action_ms: 200,
            expect_ms: 200,
            navigation_ms: 200,
            poll_interval_ms: 5,
            menu_expansion_ms: 50,
            max_month_steps: DEFAULT_MAX_MONTH_STEPS,
        }
    }

    /// Set action timeout
    #[must_use]
    pub const fn with_action_timeout(mut self, ms: u64) -> Self {
        self.action_ms = ms;
        self
    }

    /// Set assertion timeout
    #[must_use]
    pub const fn with_expect_timeout(mut self, ms: u64) -> Self {
        self.expect_ms = ms;
        self
    }

    /// Set calendar paging bound
    #[must_use]
    pub const fn with_max_month_steps(mut self, steps: u32) -> Self {
        self.max_month_steps = steps;
        self
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Browser viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Browser launch options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Run without a visible window
    pub headless: bool,
    /// Chromium executable; auto-detected when `None`
    pub chromium_path: Option<PathBuf>,
    /// Chrome sandbox
    pub sandbox: bool,
    /// Initial viewport
    pub viewport: Viewport,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            sandbox: true,
            viewport: Viewport::default(),
        }
    }
}

impl BrowserOptions {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the sandbox (containers, CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set viewport
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }
}

/// Suite run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Concurrent scenarios
    pub workers: usize,
    /// Extra attempts after a failure
    pub retries: u32,
    /// Case-insensitive substring matched against `area/name`
    pub filter: Option<String>,
    /// Stop scheduling after the first failure
    pub fail_fast: bool,
    /// Report directory
    pub output_dir: PathBuf,
    /// Page timeouts
    pub timeouts: Timeouts,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::for_ci(false)
    }
}

impl RunConfig {
    /// Defaults for the given CI flag: two retries on one worker under CI,
    /// no retries on all cores otherwise.
    #[must_use]
    pub fn for_ci(ci: bool) -> Self {
        let workers = if ci {
            1
        } else {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        };
        Self {
            workers,
            retries: if ci { 2 } else { 0 },
            filter: None,
            fail_fast: false,
            output_dir: PathBuf::from("target/ngx-e2e"),
            timeouts: Timeouts::default(),
        }
    }

    /// Set worker count (0 keeps the current value)
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        if workers > 0 {
            self.workers = workers;
        }
        self
    }

    /// Set retry count
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set fail-fast
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ci_defaults() {
        let ci = RunConfig::for_ci(true);
        assert_eq!(ci.workers, 1);
        assert_eq!(ci.retries, 2);

        let local = RunConfig::for_ci(false);
        assert!(local.workers >= 1);
        assert_eq!(local.retries, 0);
    }

    #[test]
    fn test_zero_workers_keeps_default() {
        let config = RunConfig::for_ci(true).with_workers(0);
        assert_eq!(config.workers, 1);
        let config = config.with_workers(4);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn test_timeouts_builder() {
        let t = Timeouts::default()
            .with_action_timeout(100)
            .with_expect_timeout(10_000)
            .with_max_month_steps(3);
        assert_eq!(t.action_ms, 100);
        assert_eq!(t.expect_ms, 10_000);
        assert_eq!(t.max_month_steps, 3);
        assert_eq!(t.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_browser_options_builder() {
        let opts = BrowserOptions::default()
            .with_headless(false)
            .with_no_sandbox()
            .with_chromium_path("/usr/bin/chromium")
            .with_viewport(800, 600);
        assert!(!opts.headless);
        assert!(!opts.sandbox);
        assert_eq!(opts.viewport, Viewport::new(800, 600));
        assert!(opts.chromium_path.is_some());
    }
}
