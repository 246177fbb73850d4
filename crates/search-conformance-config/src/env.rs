// crates/search-conformance-config/src/env.rs
// ============================================================================
// Module: Environment Overrides
// Description: Environment-backed overrides for the conformance config.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8, empty values, and malformed numbers fail
//! closed. Range checks happen later in config validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::config::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SEARCH_CONFORMANCE_CONFIG";

/// Environment keys that override config values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideEnv {
    /// Overrides `target.endpoint`.
    Endpoint,
    /// Overrides `limits.request_timeout_ms`.
    TimeoutMs,
    /// Overrides `runner.concurrency`.
    Concurrency,
}

impl OverrideEnv {
    /// All override keys.
    pub const ALL: [Self; 3] = [Self::Endpoint, Self::TimeoutMs, Self::Concurrency];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Endpoint => "SEARCH_CONFORMANCE_ENDPOINT",
            Self::TimeoutMs => "SEARCH_CONFORMANCE_TIMEOUT_MS",
            Self::Concurrency => "SEARCH_CONFORMANCE_CONCURRENCY",
        }
    }
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Typed overrides read from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvOverrides {
    /// Endpoint override.
    pub endpoint: Option<String>,
    /// Request timeout override in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Concurrency override.
    pub concurrency: Option<usize>,
}

impl EnvOverrides {
    /// Loads overrides from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is not valid UTF-8, is
    /// empty, or is not a positive integer where one is required.
    pub fn load() -> Result<Self, ConfigError> {
        let endpoint =
            read_env_nonempty(OverrideEnv::Endpoint.as_str())?.map(|value| value.trim().to_string());
        let request_timeout_ms = read_env_nonempty(OverrideEnv::TimeoutMs.as_str())?
            .map(|value| parse_positive::<u64>(OverrideEnv::TimeoutMs.as_str(), &value))
            .transpose()?;
        let concurrency = read_env_nonempty(OverrideEnv::Concurrency.as_str())?
            .map(|value| parse_positive::<usize>(OverrideEnv::Concurrency.as_str(), &value))
            .transpose()?;
        Ok(Self {
            endpoint,
            request_timeout_ms,
            concurrency,
        })
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.endpoint.is_none() && self.request_timeout_ms.is_none() && self.concurrency.is_none()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
pub(crate) fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive integer from an environment variable string.
fn parse_positive<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{name} must be a positive integer")))?;
    if value == T::default() {
        return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
