//! Command line runner for the ngx-admin end-to-end suite.
//!
//! Argument parsing, log setup and terminal output live here; the `ngx-e2e`
//! binary wires them to the library's [`ngx_admin_e2e::SuiteRunner`].

#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;

pub use commands::{Cli, ColorArg, Commands, ListArgs, LogFormat, RunArgs};
pub use config::{browser_options, run_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_catalog, render_environment, ProgressReporter};
