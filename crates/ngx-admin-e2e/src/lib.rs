//! ngx-admin-e2e: end-to-end UI suite for the ngx-admin dashboard
//!
//! Page objects over a browser driver seam, retrying assertions, and a
//! scenario runner that gives every test attempt its own browser session.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  SuiteRunner ── buffer_unordered(workers), retries, fail-fast   │
//! │      │ one DriverFactory::open() per attempt                    │
//! │      ▼                                                          │
//! │  TestContext ── PageManager ── page objects (pages::*)          │
//! │      │                │                                         │
//! │      │ ctx.step(..)   ▼                                         │
//! │      │           Page (auto-wait) + expect (retrying asserts)   │
//! │      ▼                │                                         │
//! │  Scenario catalog     ▼                                         │
//! │                  PageDriver ── CdpDriver (browser) | MockDriver │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ngx_admin_e2e::{Environment, RunConfig, SuiteRunner, scenarios};
//! use std::sync::Arc;
//!
//! # async fn run(factory: Arc<dyn ngx_admin_e2e::DriverFactory>) -> ngx_admin_e2e::E2eResult<()> {
//! let env = Arc::new(Environment::from_process()?);
//! let config = RunConfig::for_ci(env.ci);
//! let runner = SuiteRunner::new(factory, config.clone(), env);
//! let report = runner.run(scenarios::filtered(config.filter.as_deref())).await;
//! report.write(&config.output_dir)?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod calendar;
pub mod clock;
pub mod config;
pub mod driver;
pub mod env;
pub mod expect;
pub mod fixture;
pub mod locator;
pub mod manager;
pub mod page;
pub mod pages;
pub mod report;
pub mod runner;
pub mod scenarios;
pub mod test_data;
pub mod toggle;
pub mod wait;

/// Scriptable in-memory driver
///
/// Backs the unit tests of every page object and the runner.
pub mod mock;

mod result;

/// Chromium over the DevTools protocol
#[cfg(feature = "browser")]
pub mod cdp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BrowserOptions, RunConfig, Timeouts, Viewport};
pub use driver::{DriverFactory, Key, PageDriver};
pub use env::Environment;
pub use expect::{expect, expect_url_contains};
pub use fixture::{Setup, StepRecord, StepStatus, TestContext};
pub use locator::{AriaRole, BoundingBox, Locator};
pub use manager::PageManager;
pub use page::Page;
pub use report::{ReportFiles, RunReport, ScenarioResult, ScenarioStatus};
pub use result::{E2eError, E2eResult};
pub use runner::SuiteRunner;
pub use scenarios::{Area, Scenario};
pub use wait::ElementState;

#[cfg(feature = "browser")]
pub use cdp::{CdpDriver, CdpDriverFactory};
