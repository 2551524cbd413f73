//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use ngx_admin_e2e::report::failed_steps;
use ngx_admin_e2e::{Environment, RunReport, Scenario, ScenarioResult, ScenarioStatus};
use std::fmt::Write as _;

/// Progress reporter for a suite run
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Record one finished scenario
    pub fn scenario_finished(&self, result: &ScenarioResult) {
        let line = self.result_line(result);
        if result.status.is_failed() {
            self.emit(&line);
            if let Some(attempt) = result.attempts.last() {
                for step in failed_steps(attempt) {
                    self.emit(&format!("    step: {step}"));
                }
            }
            if let Some(error) = result.last_error() {
                self.emit(&format!("    {error}"));
            }
        } else if !self.quiet {
            self.emit(&line);
        }
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.emit(&format!("{prefix} {message}"));
    }

    /// Print the run summary
    pub fn summary(&self, report: &RunReport) {
        let failed = report.count(ScenarioStatus::Failed);
        if self.quiet && failed == 0 {
            return;
        }

        let verdict = if failed > 0 { "FAILED" } else { "PASSED" };
        let verdict = if self.use_color {
            let style = if failed > 0 {
                Style::new().red().bold()
            } else {
                Style::new().green().bold()
            };
            style.apply_to(verdict).to_string()
        } else {
            verdict.to_string()
        };

        self.emit("");
        self.emit(&format!("{verdict} {}", report.summary()));
    }

    /// One status line for a finished scenario
    #[must_use]
    pub fn result_line(&self, result: &ScenarioResult) -> String {
        let label = result.status.label();
        let label = if self.use_color {
            match result.status {
                ScenarioStatus::Passed => style(label).green().to_string(),
                ScenarioStatus::Flaky => style(label).yellow().to_string(),
                ScenarioStatus::Failed => style(label).red().bold().to_string(),
                ScenarioStatus::Skipped => style(label).dim().to_string(),
            }
        } else {
            label.to_string()
        };

        let mut line = format!("{label} {}", result.id);
        match result.status {
            ScenarioStatus::Skipped => {
                if let Some(reason) = &result.skip_reason {
                    let _ = write!(line, " ({reason})");
                }
            }
            _ => {
                let _ = write!(line, " [{}ms", result.duration_ms);
                if result.attempts.len() > 1 {
                    let _ = write!(line, ", {} attempts", result.attempts.len());
                }
                line.push(']');
            }
        }
        line
    }

    fn emit(&self, line: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.println(line),
            None => {
                note_write_failure(self.term.write_line(line));
            }
        }
    }
}

/// Log a failed terminal write; the run carries on either way.
/// Returns whether the write succeeded.
fn note_write_failure(result: std::io::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "stderr write failed");
            false
        }
    }
}

/// Catalog listing, one scenario per line
#[must_use]
pub fn render_catalog(scenarios: &[Scenario]) -> String {
    let mut out = String::new();
    for scenario in scenarios {
        let _ = write!(out, "{:<15} {}", scenario.area.slug(), scenario.id());
        if let Some(reason) = scenario.skip {
            let _ = write!(out, "  [skipped: {reason}]");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{} scenarios", scenarios.len());
    out
}

/// Loaded environment with the password masked
#[must_use]
pub fn render_environment(env: &Environment) -> String {
    let filters = if env.age_filters.is_empty() {
        "(none)".to_string()
    } else {
        env.age_filters.join(", ")
    };
    let rows = [
        ("BASE_URL", env.base_url.clone()),
        ("TEST_USER_EMAIL", env.test_user.email.clone()),
        ("TEST_USER_PASSWORD", env.masked_password()),
        ("TEST_DELETE_EMAIL", env.test_emails.delete_target.clone()),
        ("TEST_EDIT_EMAIL", env.test_emails.edit_target.clone()),
        ("TEST_AGE_FILTERS", filters),
        ("CI", env.ci.to_string()),
    ];

    let mut out = String::new();
    for (key, value) in rows {
        let _ = writeln!(out, "{key:<20} {value}");
    }
    out
}
