//! CLI configuration and the mapping from flags to suite settings

use crate::commands::{Cli, ColorArg, LogFormat, RunArgs};
use ngx_admin_e2e::{BrowserOptions, RunConfig};
use serde::{Deserialize, Serialize};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - debug logs
    Verbose,
    /// Trace - everything
    Trace,
}

impl Verbosity {
    /// Level from the `-q` flag and `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Default `tracing` filter directive when `RUST_LOG` is unset
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn,ngx_admin_e2e=info",
            Self::Verbose => "info,ngx_admin_e2e=debug",
            Self::Trace => "debug,ngx_admin_e2e=trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Global CLI settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CliConfig {
    pub verbosity: Verbosity,
    pub color: ColorChoice,
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Settings from the global flags
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
            color: cli.color.into(),
            log_format: cli.log_format,
        }
    }
}

/// Suite settings for `run`: CI defaults first, then explicit flags.
#[must_use]
pub fn run_config(args: &RunArgs, ci: bool) -> RunConfig {
    let mut config = RunConfig::for_ci(ci)
        .with_workers(args.workers)
        .with_fail_fast(args.fail_fast);
    if let Some(retries) = args.retries {
        config = config.with_retries(retries);
    }
    if let Some(filter) = &args.filter {
        config = config.with_filter(filter.clone());
    }
    if let Some(dir) = &args.output {
        config = config.with_output_dir(dir.clone());
    }
    if let Some(ms) = args.timeout {
        let timeouts = config
            .timeouts
            .with_action_timeout(ms)
            .with_expect_timeout(ms);
        config = config.with_timeouts(timeouts);
    }
    config
}

/// Browser launch settings for `run`
#[must_use]
pub fn browser_options(args: &RunArgs) -> BrowserOptions {
    let mut options = BrowserOptions::default().with_headless(!args.headed);
    if let Some(path) = &args.chromium {
        options = options.with_chromium_path(path.clone());
    }
    if args.no_sandbox {
        options = options.with_no_sandbox();
    }
    options
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_quiet_wins_over_verbose() {
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Trace);
        }

        #[test]
        fn test_filter_directive_scopes_library() {
            assert_eq!(Verbosity::Quiet.filter_directive(), "error");
            assert!(Verbosity::Verbose
                .filter_directive()
                .contains("ngx_admin_e2e=debug"));
        }

        #[test]
        fn test_explicit_color_choices() {
            assert!(ColorChoice::from(ColorArg::Always).should_color());
            assert!(!ColorChoice::from(ColorArg::Never).should_color());
        }
    }

    mod run_config_tests {
        use super::*;

        #[test]
        fn test_ci_defaults_apply_without_flags() {
            let config = run_config(&RunArgs::default(), true);
            assert_eq!(config.workers, 1);
            assert_eq!(config.retries, 2);
            assert!(!config.fail_fast);
        }

        #[test]
        fn test_flags_override_ci_defaults() {
            let args = RunArgs {
                workers: 4,
                retries: Some(0),
                filter: Some("forms".into()),
                output: Some(PathBuf::from("out")),
                fail_fast: true,
                timeout: Some(7000),
                ..RunArgs::default()
            };
            let config = run_config(&args, true);
            assert_eq!(config.workers, 4);
            assert_eq!(config.retries, 0);
            assert_eq!(config.filter.as_deref(), Some("forms"));
            assert_eq!(config.output_dir, PathBuf::from("out"));
            assert!(config.fail_fast);
            assert_eq!(config.timeouts.action_ms, 7000);
            assert_eq!(config.timeouts.expect_ms, 7000);
        }

        #[test]
        fn test_browser_options_from_flags() {
            let options = browser_options(&RunArgs::default());
            assert!(options.headless);
            assert!(options.sandbox);

            let args = RunArgs {
                headed: true,
                no_sandbox: true,
                chromium: Some(PathBuf::from("/opt/chrome")),
                ..RunArgs::default()
            };
            let options = browser_options(&args);
            assert!(!options.headless);
            assert!(!options.sandbox);
            assert_eq!(options.chromium_path, Some(PathBuf::from("/opt/chrome")));
        }
    }
}
