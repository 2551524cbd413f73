//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// The run finished with failing scenarios
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed {
        /// Failed scenarios
        failed: usize,
        /// Scenarios in the run
        total: usize,
    },

    /// Logging could not be installed
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Suite library error
    #[error(transparent)]
    E2e(#[from] ngx_admin_e2e::E2eError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Process exit status: 1 for failing scenarios, 2 for everything else
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::ScenariosFailed { .. } => 1,
            _ => 2,
        }
    }
}
