//! Log subscriber installation.
//!
//! Log lines go to stderr so `list` and `env` output stays clean on stdout.
//! `RUST_LOG` replaces the verbosity-derived filter when set.

use crate::commands::LogFormat;
use crate::config::{CliConfig, Verbosity};
use crate::error::{CliError, CliResult};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the verbosity default
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()))
}

/// Install the global subscriber for this process
pub fn init(config: &CliConfig) -> CliResult<()> {
    let filter = env_filter(config.verbosity);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.log_format {
        LogFormat::Text => builder
            .with_ansi(config.color.should_color())
            .compact()
            .try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
    installed.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}
