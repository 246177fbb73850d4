// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Suite Harness
// Description: Config builders for suites that target the stub service.
// Purpose: Keep stub-facing configuration consistent across suites.
// Dependencies: search-conformance-config
// ============================================================================

use std::time::Duration;

use search_conformance_config::SearchConformanceConfig;

use crate::helpers::timeouts::resolve_timeout;

/// Oversized query length used against the stub.
pub const STUB_OVERSIZED_CHARS: usize = 8_192;
/// Longest query the stub accepts before answering 414.
pub const STUB_MAX_QUERY_CHARS: usize = 2_048;
/// Retry delay used against the stub.
const STUB_RETRY_DELAY_MS: u64 = 10;
/// Largest request timeout the config accepts.
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds a validated config pointing at a loopback stub endpoint.
pub fn stub_config(endpoint: &str) -> Result<SearchConformanceConfig, String> {
    let mut config = SearchConformanceConfig::default();
    config.target.endpoint = endpoint.to_string();
    config.target.allow_http = true;
    config.catalog.oversized_query_chars = STUB_OVERSIZED_CHARS;
    config.runner.retry_base_delay_ms = STUB_RETRY_DELAY_MS;
    let timeout = resolve_timeout(Duration::from_secs(5))?.min(MAX_REQUEST_TIMEOUT);
    config.limits.request_timeout_ms = u64::try_from(timeout.as_millis())
        .map_err(|_| "timeout override is out of range".to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

/// Renders the stub config as TOML for the CLI binary.
pub fn stub_config_toml(endpoint: &str) -> String {
    format!(
        "[target]\nendpoint = \"{endpoint}\"\nallow_http = true\n\n\
         [runner]\nretry_base_delay_ms = {STUB_RETRY_DELAY_MS}\n\n\
         [catalog]\noversized_query_chars = {STUB_OVERSIZED_CHARS}\n"
    )
}
