//! Suite runner.
//!
//! Scenarios run concurrently up to `workers`, each attempt in its own
//! driver session. A failed attempt is retried up to `retries` times with a
//! fresh session; one scenario failing never aborts the others unless
//! fail-fast is on, in which case scenarios not yet started are skipped.

use crate::clock::{Clock, SystemClock};
use crate::config::RunConfig;
use crate::driver::DriverFactory;
use crate::env::Environment;
use crate::fixture::TestContext;
use crate::page::Page;
use crate::report::{AttemptRecord, RunReport, ScenarioResult};
use crate::result::E2eResult;
use crate::scenarios::Scenario;
use base64::Engine as _;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Skip reason for scenarios never started after a fail-fast stop
pub const FAIL_FAST_REASON: &str = "not started: an earlier scenario failed (fail-fast)";

/// Runs scenarios against sessions opened by a [`DriverFactory`]
pub struct SuiteRunner {
    factory: Arc<dyn DriverFactory>,
    config: RunConfig,
    env: Arc<Environment>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SuiteRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteRunner")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl SuiteRunner {
    /// Runner over `factory` using the system clock
    #[must_use]
    pub fn new(factory: Arc<dyn DriverFactory>, config: RunConfig, env: Arc<Environment>) -> Self {
        Self {
            factory,
            config,
            env,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock handed to every context
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run `scenarios` and collect the report
    pub async fn run(&self, scenarios: Vec<Scenario>) -> RunReport {
        self.run_with(scenarios, |_| {}).await
    }

    /// Run `scenarios`, calling `on_result` as each one finishes
    pub async fn run_with<F>(&self, scenarios: Vec<Scenario>, on_result: F) -> RunReport
    where
        F: Fn(&ScenarioResult) + Send + Sync,
    {
        let run_id = Uuid::new_v4();
        let started_at = chrono::Utc::now();
        let start = Instant::now();
        let workers = self.config.workers.max(1);
        let stop = AtomicBool::new(false);
        info!(
            %run_id,
            scenarios = scenarios.len(),
            workers,
            retries = self.config.retries,
            "starting run"
        );

        let (stop, on_result) = (&stop, &on_result);
        let mut indexed: Vec<(usize, ScenarioResult)> = stream::iter(scenarios.into_iter().enumerate())
            .map(|(index, scenario)| async move {
                let result = self.run_scenario(&scenario, stop).await;
                on_result(&result);
                (index, result)
            })
            .buffer_unordered(workers)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);

        let report = RunReport {
            run_id,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            base_url: self.env.base_url.clone(),
            workers,
            retries: self.config.retries,
            results: indexed.into_iter().map(|(_, r)| r).collect(),
        };
        info!(%run_id, summary = %report.summary(), "run finished");
        report
    }

    async fn run_scenario(&self, scenario: &Scenario, stop: &AtomicBool) -> ScenarioResult {
        if let Some(reason) = scenario.skip {
            debug!(scenario = %scenario.id(), reason, "skipped");
            return ScenarioResult::skipped(scenario, reason);
        }

        let mut attempts = Vec::new();
        for attempt in 1..=self.config.retries.saturating_add(1) {
            if stop.load(Ordering::SeqCst) {
                break;
            }
            let span = info_span!("scenario", id = %scenario.id(), attempt);
            let record = self.attempt(scenario, attempt).instrument(span).await;
            let passed = record.passed;
            attempts.push(record);
            if passed {
                break;
            }
        }
        if attempts.is_empty() {
            return ScenarioResult::skipped(scenario, FAIL_FAST_REASON);
        }

        let result = ScenarioResult::from_attempts(scenario, attempts);
        if result.status.is_failed() {
            warn!(scenario = %result.id, error = result.last_error().unwrap_or_default(), "scenario failed");
            if self.config.fail_fast {
                stop.store(true, Ordering::SeqCst);
            }
        }
        result
    }

    async fn attempt(&self, scenario: &Scenario, attempt: u32) -> AttemptRecord {
        let start = Instant::now();
        let driver = match self.factory.open().await {
            Ok(driver) => driver,
            Err(e) => {
                return AttemptRecord {
                    attempt,
                    passed: false,
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: Some(e.to_string()),
                    steps: Vec::new(),
                    screenshot_png: None,
                }
            }
        };

        let page = Page::new(driver.clone(), self.env.base_url.clone(), self.config.timeouts);
        let ctx = TestContext::new(page, self.env.clone(), self.clock.clone(), attempt);
        let outcome = scenario.execute(&ctx).await;
        let screenshot_png = match &outcome {
            Ok(()) => None,
            Err(_) => capture(ctx.page()).await,
        };
        if let Err(e) = driver.close().await {
            warn!(error = %e, "closing session failed");
        }

        AttemptRecord {
            attempt,
            passed: outcome.is_ok(),
            duration_ms: start.elapsed().as_millis() as u64,
            error: outcome.err().map(|e| e.to_string()),
            steps: ctx.steps(),
            screenshot_png,
        }
    }
}

async fn capture(page: &Page) -> Option<String> {
    let shot: E2eResult<Vec<u8>> = page.screenshot().await;
    match shot {
        Ok(bytes) => Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
        Err(e) => {
            debug!(error = %e, "no failure screenshot");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::Timeouts;
    use crate::fixture::tests::sample_env;
    use crate::fixture::Setup;
    use crate::mock::{MockDriver, MockDriverFactory};
    use crate::report::ScenarioStatus;
    use crate::result::E2eError;
    use crate::scenarios::Area;
    use std::sync::atomic::AtomicU32;

    static FLAKY_CALLS: AtomicU32 = AtomicU32::new(0);

    fn pass() -> Scenario {
        Scenario::new(Area::Forms, "passes", Setup::None, |ctx| {
            Box::pin(async move { ctx.step("noop", async { Ok(()) }).await })
        })
    }

    fn fail(name: &'static str) -> Scenario {
        Scenario::new(Area::Forms, name, Setup::None, |ctx| {
            Box::pin(async move {
                ctx.step("broken", async { Err::<(), _>(E2eError::assertion("nope")) })
                    .await
            })
        })
    }

    fn flaky() -> Scenario {
        Scenario::new(Area::Tables, "flaky", Setup::None, |_| {
            Box::pin(async {
                if FLAKY_CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(E2eError::timeout("row", 10))
                } else {
                    Ok(())
                }
            })
        })
    }

    fn runner(config: RunConfig) -> (Arc<MockDriverFactory>, SuiteRunner) {
        let factory = Arc::new(MockDriverFactory::new(MockDriver::new));
        let runner = SuiteRunner::new(
            factory.clone(),
            config.with_timeouts(Timeouts::fast()),
            Arc::new(sample_env()),
        )
        .with_clock(Arc::new(FixedClock::ymd(2026, 10, 16).unwrap()));
        (factory, runner)
    }

    #[tokio::test]
    async fn test_results_keep_catalog_order() {
        let (factory, runner) = runner(RunConfig::for_ci(false).with_workers(4));
        let skipped = pass().skipped("later");
        let report = runner
            .run(vec![fail("first"), pass(), skipped])
            .await;

        let ids: Vec<_> = report.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["forms/first", "forms/passes", "forms/passes"]);
        assert_eq!(report.results[0].status, ScenarioStatus::Failed);
        assert_eq!(report.results[1].status, ScenarioStatus::Passed);
        assert_eq!(report.results[2].status, ScenarioStatus::Skipped);
        assert_eq!(factory.opened(), 2);
        assert_eq!(report.base_url, "http://app");
    }

    #[tokio::test]
    async fn test_failures_are_retried_with_fresh_sessions() {
        let (factory, runner) = runner(RunConfig::for_ci(true));
        let report = runner.run(vec![fail("always")]).await;

        let result = &report.results[0];
        assert_eq!(result.attempts.len(), 3);
        assert_eq!(factory.opened(), 3);
        assert!(result.attempts.iter().all(|a| a.screenshot_png.is_some()));
        assert_eq!(result.attempts[2].steps[0].name, "broken");
        assert_eq!(result.last_error(), Some("Assertion failed: nope"));
    }

    #[tokio::test]
    async fn test_pass_on_retry_is_flaky() {
        let (_, runner) = runner(RunConfig::for_ci(false).with_retries(1));
        let report = runner.run(vec![flaky()]).await;
        assert_eq!(report.results[0].status, ScenarioStatus::Flaky);
        assert!(report.all_passed());
    }

    #[tokio::test]
    async fn test_max_retries_still_runs_first_attempt() {
        let (factory, runner) = runner(RunConfig::for_ci(false).with_retries(u32::MAX));
        let report = runner.run(vec![pass()]).await;
        assert_eq!(report.results[0].status, ScenarioStatus::Passed);
        assert_eq!(report.results[0].attempts.len(), 1);
        assert_eq!(factory.opened(), 1);
    }

    #[tokio::test]
    async fn test_fail_fast_skips_unstarted() {
        let (_, runner) = runner(
            RunConfig::for_ci(false)
                .with_workers(1)
                .with_fail_fast(true),
        );
        let report = runner.run(vec![fail("first"), pass()]).await;
        assert_eq!(report.results[1].status, ScenarioStatus::Skipped);
        assert_eq!(report.results[1].skip_reason.as_deref(), Some(FAIL_FAST_REASON));
    }

    #[tokio::test]
    async fn test_on_result_sees_every_scenario() {
        let (_, runner) = runner(RunConfig::for_ci(false).with_workers(2));
        let seen = std::sync::Mutex::new(Vec::new());
        runner
            .run_with(vec![pass(), fail("second")], |r| {
                seen.lock().unwrap().push(r.status);
            })
            .await;
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
