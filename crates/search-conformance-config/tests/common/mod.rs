// crates/search-conformance-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for the config crate.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use search_conformance_config::ConfigError;
use search_conformance_config::SearchConformanceConfig;

/// Result type for config tests.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a config without validation.
pub fn config_from_toml(toml_str: &str) -> Result<SearchConformanceConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a config with all defaults applied.
pub fn minimal_config() -> Result<SearchConformanceConfig, String> {
    config_from_toml("").map_err(|err| err.to_string())
}

/// Asserts that a validation result is an error containing `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(()) => Err(format!("expected error containing '{needle}'")),
    }
}
