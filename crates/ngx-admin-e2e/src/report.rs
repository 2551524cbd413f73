//! Run reports.
//!
//! A finished run is written three ways under the output directory:
//!
//! ```text
//! report.json   machine-readable RunReport (serde)
//! report.html   self-contained page, failure screenshots inlined as data URIs
//! junit.xml     one <testcase> per scenario for CI dashboards
//! ```

use crate::fixture::{StepRecord, StepStatus};
use crate::result::E2eResult;
use crate::scenarios::{Area, Scenario};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Final state of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Passed on the first attempt
    Passed,
    /// Passed after at least one failed attempt
    Flaky,
    /// Every attempt failed
    Failed,
    /// Not run
    Skipped,
}

impl ScenarioStatus {
    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Flaky => "flaky",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// One attempt at a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub attempt: u32,
    pub passed: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    /// Steps the attempt got through
    pub steps: Vec<StepRecord>,
    /// Base64 PNG captured after a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_png: Option<String>,
}

/// Outcome of one scenario across its attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// `area/name`
    pub id: String,
    pub area: Area,
    pub name: String,
    pub status: ScenarioStatus,
    pub skip_reason: Option<String>,
    pub duration_ms: u64,
    pub attempts: Vec<AttemptRecord>,
}

impl ScenarioResult {
    /// Result for a scenario that was never started
    #[must_use]
    pub fn skipped(scenario: &Scenario, reason: impl Into<String>) -> Self {
        Self {
            id: scenario.id(),
            area: scenario.area,
            name: scenario.name.to_string(),
            status: ScenarioStatus::Skipped,
            skip_reason: Some(reason.into()),
            duration_ms: 0,
            attempts: Vec::new(),
        }
    }

    /// Result from the attempts made, in order
    #[must_use]
    pub fn from_attempts(scenario: &Scenario, attempts: Vec<AttemptRecord>) -> Self {
        let status = match attempts.iter().position(|a| a.passed) {
            Some(0) => ScenarioStatus::Passed,
            Some(_) => ScenarioStatus::Flaky,
            None => ScenarioStatus::Failed,
        };
        Self {
            id: scenario.id(),
            area: scenario.area,
            name: scenario.name.to_string(),
            status,
            skip_reason: None,
            duration_ms: attempts.iter().map(|a| a.duration_ms).sum(),
            attempts,
        }
    }

    /// Error of the last failed attempt
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.attempts
            .iter()
            .rev()
            .find_map(|a| a.error.as_deref())
    }
}

/// Paths written by [`RunReport::write`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub json: PathBuf,
    pub html: PathBuf,
    pub junit: PathBuf,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub base_url: String,
    pub workers: usize,
    pub retries: u32,
    /// Results in catalog order
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    /// Number of results with `status`
    #[must_use]
    pub fn count(&self, status: ScenarioStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// No scenario failed; flaky and skipped scenarios do not fail a run
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.results.iter().any(|r| r.status.is_failed())
    }

    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results
            .iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} flaky, {} failed, {} skipped ({} total) in {:.1}s",
            self.count(ScenarioStatus::Passed),
            self.count(ScenarioStatus::Flaky),
            self.count(ScenarioStatus::Failed),
            self.count(ScenarioStatus::Skipped),
            self.total(),
            self.duration_ms as f64 / 1000.0
        )
    }

    /// Write `report.json`, `report.html` and `junit.xml` into `dir`
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or a file written
    pub fn write(&self, dir: &Path) -> E2eResult<ReportFiles> {
        std::fs::create_dir_all(dir)?;
        let files = ReportFiles {
            json: dir.join("report.json"),
            html: dir.join("report.html"),
            junit: dir.join("junit.xml"),
        };
        std::fs::write(&files.json, serde_json::to_string_pretty(self)?)?;
        std::fs::write(&files.html, self.render_html())?;
        std::fs::write(&files.junit, self.render_junit())?;
        tracing::info!(dir = %dir.display(), "reports written");
        Ok(files)
    }

    /// Render the HTML report
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        html.push_str(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>ngx-admin E2E Report</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        .summary { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        .test { padding: 10px; margin: 5px 0; border-radius: 4px; }
        .test.passed { background: #e8f5e9; border-left: 4px solid #4caf50; }
        .test.flaky { background: #fffde7; border-left: 4px solid #fbc02d; }
        .test.failed { background: #ffebee; border-left: 4px solid #f44336; }
        .test.skipped { background: #fff3e0; border-left: 4px solid #ff9800; }
        .error { color: #d32f2f; font-family: monospace; white-space: pre-wrap; }
        .steps { margin: 6px 0 0 0; font-size: 0.9em; }
        .steps .Failed { color: #d32f2f; }
        img.screenshot { max-width: 640px; border: 1px solid #ddd; margin-top: 8px; }
    </style>
</head>
<body>
"#,
        );

        let _ = write!(
            html,
            r#"<div class="summary">
    <h1>ngx-admin E2E Report</h1>
    <p>Run {} against {} started {}</p>
    <h2>{}</h2>
</div>
"#,
            self.run_id,
            escape(&self.base_url),
            self.started_at.to_rfc3339(),
            escape(&self.summary())
        );

        for result in &self.results {
            let _ = write!(
                html,
                "<div class=\"test {}\">\n    <strong>{}</strong> - {} ({} ms)\n",
                result.status.label(),
                escape(&result.id),
                result.status.label(),
                result.duration_ms
            );
            if let Some(reason) = &result.skip_reason {
                let _ = writeln!(html, "    <div>Skipped: {}</div>", escape(reason));
            }
            for attempt in &result.attempts {
                render_attempt(&mut html, attempt, result.attempts.len() > 1);
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Render JUnit XML
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            xml,
            "<testsuite name=\"ngx-admin-e2e\" tests=\"{}\" failures=\"{}\" skipped=\"{}\" time=\"{:.3}\">",
            self.total(),
            self.count(ScenarioStatus::Failed),
            self.count(ScenarioStatus::Skipped),
            self.duration_ms as f64 / 1000.0
        );
        for result in &self.results {
            let _ = write!(
                xml,
                "  <testcase classname=\"{}\" name=\"{}\" time=\"{:.3}\"",
                result.area,
                escape(&result.name),
                result.duration_ms as f64 / 1000.0
            );
            match result.status {
                ScenarioStatus::Failed => {
                    let message = result.last_error().unwrap_or("failed");
                    let _ = writeln!(
                        xml,
                        ">\n    <failure message=\"{}\"/>\n  </testcase>",
                        escape(message)
                    );
                }
                ScenarioStatus::Skipped => {
                    let reason = result.skip_reason.as_deref().unwrap_or_default();
                    let _ = writeln!(
                        xml,
                        ">\n    <skipped message=\"{}\"/>\n  </testcase>",
                        escape(reason)
                    );
                }
                ScenarioStatus::Passed | ScenarioStatus::Flaky => xml.push_str("/>\n"),
            }
        }
        xml.push_str("</testsuite>\n");
        xml
    }
}

fn render_attempt(html: &mut String, attempt: &AttemptRecord, numbered: bool) {
    if numbered {
        let _ = writeln!(
            html,
            "    <div>Attempt {}: {}</div>",
            attempt.attempt,
            if attempt.passed { "passed" } else { "failed" }
        );
    }
    if !attempt.steps.is_empty() {
        html.push_str("    <ol class=\"steps\">\n");
        for step in &attempt.steps {
            let _ = writeln!(
                html,
                "        <li class=\"{:?}\">{} ({} ms)</li>",
                step.status,
                escape(&step.name),
                step.duration_ms
            );
        }
        html.push_str("    </ol>\n");
    }
    if let Some(error) = &attempt.error {
        let _ = writeln!(html, "    <div class=\"error\">{}</div>", escape(error));
    }
    if let Some(png) = &attempt.screenshot_png {
        let _ = writeln!(
            html,
            "    <img class=\"screenshot\" alt=\"failure screenshot\" src=\"data:image/png;base64,{png}\">"
        );
    }
}

/// Escape text for HTML and XML bodies and attributes
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Failed steps of an attempt, by name
#[must_use]
pub fn failed_steps(attempt: &AttemptRecord) -> Vec<&str> {
    attempt
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Failed)
        .map(|s| s.name.as_str())
        .collect()
}
