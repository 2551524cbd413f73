//! Per-attempt test context.
//!
//! A [`TestContext`] is assembled once per scenario attempt from a fresh
//! driver session. It owns the page objects, the environment and the clock,
//! and records every named step it runs.

use crate::clock::Clock;
use crate::env::Environment;
use crate::manager::PageManager;
use crate::page::Page;
use crate::pages::navigation::group_of;
use crate::result::{E2eError, E2eResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{info_span, warn, Instrument};

/// Outcome of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Passed,
    Failed,
}

/// One recorded step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step name
    pub name: String,
    /// Outcome
    pub status: StepStatus,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Error message for a failed step
    pub error: Option<String>,
}

/// What runs before a scenario body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Setup {
    /// Nothing; the body navigates itself
    None,
    /// Load the application root
    Home,
    /// Load the application root, then open a sidebar menu item
    HomeThen(&'static str),
}

impl Setup {
    /// Run the setup inside `ctx`
    pub async fn apply(self, ctx: &TestContext) -> E2eResult<()> {
        match self {
            Self::None => Ok(()),
            Self::Home => {
                ctx.step("Navigate to home", ctx.pages().navigate_to().navigate_to_home())
                    .await
            }
            Self::HomeThen(item) => {
                ctx.step("Navigate to home", ctx.pages().navigate_to().navigate_to_home())
                    .await?;
                let name = format!("Navigate to {item}");
                ctx.step(&name, ctx.pages().navigate_to().navigate_to_menu_item(item))
                    .await
            }
        }
    }

    /// Menu item this setup opens, if any
    #[must_use]
    pub const fn menu_item(self) -> Option<&'static str> {
        match self {
            Self::HomeThen(item) => Some(item),
            Self::None | Self::Home => None,
        }
    }

    /// Reject a menu item missing from the sidebar table
    pub fn validate(self) -> E2eResult<()> {
        match self.menu_item() {
            Some(item) if group_of(item).is_none() => Err(E2eError::MenuItemNotFound {
                item: item.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Everything a scenario body can reach
#[derive(Debug)]
pub struct TestContext {
    pages: PageManager,
    env: Arc<Environment>,
    clock: Arc<dyn Clock>,
    attempt: u32,
    steps: Mutex<Vec<StepRecord>>,
}

impl TestContext {
    /// Context for `attempt` (1-based) over `page`
    #[must_use]
    pub fn new(page: Page, env: Arc<Environment>, clock: Arc<dyn Clock>, attempt: u32) -> Self {
        Self {
            pages: PageManager::new(page, clock.clone()),
            env,
            clock,
            attempt,
            steps: Mutex::new(Vec::new()),
        }
    }

    /// Page objects of this session
    #[must_use]
    pub const fn pages(&self) -> &PageManager {
        &self.pages
    }

    /// Raw page context
    #[must_use]
    pub const fn page(&self) -> &Page {
        self.pages.page()
    }

    #[must_use]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Steps recorded so far
    #[must_use]
    pub fn steps(&self) -> Vec<StepRecord> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `body` as a named step inside a tracing span and record it
    pub async fn step<T, F>(&self, name: &str, body: F) -> E2eResult<T>
    where
        F: Future<Output = E2eResult<T>>,
    {
        let span = info_span!("step", step = name, attempt = self.attempt);
        let start = Instant::now();
        let result = body.instrument(span).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (status, error) = match &result {
            Ok(_) => (StepStatus::Passed, None),
            Err(e) => {
                warn!(step = name, error = %e, "step failed");
                (StepStatus::Failed, Some(e.to_string()))
            }
        };
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StepRecord {
                name: name.to_string(),
                status,
                duration_ms,
                error,
            });
        result
    }
}
