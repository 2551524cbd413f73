//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ngx-e2e: end-to-end UI suite for the ngx-admin dashboard
#[derive(Parser, Debug)]
#[command(name = "ngx-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format on stderr
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Upper bound for `run --retries`
pub const MAX_RETRIES: i64 = 10;

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the application at BASE_URL
    Run(RunArgs),

    /// List catalog scenarios
    List(ListArgs),

    /// Validate and print the loaded environment
    Env,
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Only scenarios whose `area/name` contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Concurrent scenarios (0 = default for the CI mode)
    #[arg(short = 'j', long, default_value = "0")]
    pub workers: usize,

    /// Extra attempts after a failure (default: 2 under CI, 0 otherwise)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_RETRIES))]
    pub retries: Option<u32>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chromium executable
    #[arg(long, value_name = "PATH")]
    pub chromium: Option<PathBuf>,

    /// Disable the Chrome sandbox (containers)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Report directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop scheduling scenarios after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Action and assertion timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Use CI defaults even when CI is unset
    #[arg(long)]
    pub ci: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    /// Only scenarios whose `area/name` contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Detect terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}
