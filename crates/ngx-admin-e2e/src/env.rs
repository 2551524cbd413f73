//! Environment configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file in the working directory. Required keys fail fast with
//! [`E2eError::MissingEnv`]; there are no built-in fallbacks, so a missing
//! `BASE_URL` stops the run before any browser is launched.

use crate::result::{E2eError, E2eResult};
use serde::Serialize;
use std::sync::OnceLock;

/// Application root URL
pub const BASE_URL: &str = "BASE_URL";
/// Login email used by the grid form
pub const TEST_USER_EMAIL: &str = "TEST_USER_EMAIL";
/// Password used by the grid form
pub const TEST_USER_PASSWORD: &str = "TEST_USER_PASSWORD";
/// Smart table row removed by the delete scenario
pub const TEST_DELETE_EMAIL: &str = "TEST_DELETE_EMAIL";
/// Smart table row edited by the edit scenario
pub const TEST_EDIT_EMAIL: &str = "TEST_EDIT_EMAIL";
/// Comma-separated age filter values
pub const TEST_AGE_FILTERS: &str = "TEST_AGE_FILTERS";
/// Set by CI systems; changes retry and worker defaults
pub const CI: &str = "CI";

/// Read a variable through `lookup`.
///
/// An empty value is treated the same as an absent one. Required keys
/// produce [`E2eError::MissingEnv`]; optional keys yield an empty string.
pub fn get_env_with<F>(lookup: F, key: &str, required: bool) -> E2eResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        Some(value) => Ok(value),
        None if required => Err(E2eError::MissingEnv {
            key: key.to_string(),
        }),
        None => Ok(String::new()),
    }
}

/// Read a variable from the process environment.
pub fn get_env(key: &str, required: bool) -> E2eResult<String> {
    get_env_with(|k| std::env::var(k).ok(), key, required)
}

/// Split a comma-separated list, dropping blank entries.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn is_truthy(raw: &str) -> bool {
    !raw.is_empty() && !matches!(raw.to_ascii_lowercase().as_str(), "0" | "false" | "no")
}

/// Credentials for the grid login form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestUser {
    /// Email address
    pub email: String,
    /// Password
    #[serde(skip_serializing)]
    pub password: String,
}

/// Smart table rows targeted by mutating scenarios
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestEmails {
    /// Row removed by the delete scenario
    pub delete_target: String,
    /// Row edited by the edit scenario
    pub edit_target: String,
}

/// Process-wide, read-only configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    /// Application root URL, without a trailing slash
    pub base_url: String,
    /// Login credentials
    pub test_user: TestUser,
    /// Smart table targets
    pub test_emails: TestEmails,
    /// Age filter values, possibly empty
    pub age_filters: Vec<String>,
    /// Running under CI
    pub ci: bool,
}

static GLOBAL: OnceLock<Environment> = OnceLock::new();

impl Environment {
    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> E2eResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = get_env_with(&lookup, BASE_URL, true)?;
        let env = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            test_user: TestUser {
                email: get_env_with(&lookup, TEST_USER_EMAIL, true)?,
                password: get_env_with(&lookup, TEST_USER_PASSWORD, true)?,
            },
            test_emails: TestEmails {
                delete_target: get_env_with(&lookup, TEST_DELETE_EMAIL, true)?,
                edit_target: get_env_with(&lookup, TEST_EDIT_EMAIL, true)?,
            },
            age_filters: parse_list(&get_env_with(&lookup, TEST_AGE_FILTERS, false)?),
            ci: is_truthy(&get_env_with(&lookup, CI, false)?),
        };
        Ok(env)
    }

    /// Build from the process environment after loading `.env` if present.
    pub fn from_process() -> E2eResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// The process-wide configuration, constructed on first use.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn global() -> E2eResult<&'static Self> {
        if let Some(env) = GLOBAL.get() {
            return Ok(env);
        }
        let env = Self::from_process()?;
        Ok(GLOBAL.get_or_init(|| env))
    }

    /// Password with every character masked.
    #[must_use]
    pub fn masked_password(&self) -> String {
        "*".repeat(self.test_user.password.chars().count().min(12))
    }
}
