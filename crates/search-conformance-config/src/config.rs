// crates/search-conformance-config/src/config.rs
// ============================================================================
// Module: Search Conformance Configuration
// Description: Configuration loading and validation for the conformance suite.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: search-conformance-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! An explicitly named file (CLI argument or environment variable) must
//! exist; the default file is read only when present. Environment overrides
//! apply after parsing and before validation, so overridden values are
//! checked against the same limits.
//!
//! Security posture: config inputs are untrusted; endpoints must use HTTPS
//! unless cleartext is explicitly allowed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use search_conformance_core::CatalogOptions;
use search_conformance_core::FeatureTag;
use search_conformance_core::HighlightMarkers;
use search_conformance_core::RetryPolicy;
use search_conformance_core::RunnerConfig;
use search_conformance_core::ScenarioId;
use search_conformance_core::ScenarioSelection;
use search_conformance_core::catalog::DEFAULT_OVERSIZED_QUERY_CHARS;
use search_conformance_core::catalog::DEFAULT_OVERSIZED_SEED;
use search_conformance_core::catalog::MAX_OVERSIZED_QUERY_CHARS;
use search_conformance_core::catalog::REQUEST_URI_PREFIX_BYTES;
use search_conformance_core::normalize::DEFAULT_HIGHLIGHT_MARKERS;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::env::CONFIG_ENV_VAR;
use crate::env::EnvOverrides;
use crate::env::read_env_nonempty;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "search-conformance.toml";
/// Default search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.hh.ru/vacancies";
/// Default query parameter name.
pub const DEFAULT_QUERY_PARAM: &str = "text";
/// Maximum config file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum endpoint URL length.
pub(crate) const MAX_ENDPOINT_LENGTH: usize = 2048;
/// Maximum query parameter name length.
pub(crate) const MAX_QUERY_PARAM_LENGTH: usize = 64;
/// Endpoint, `?` or `&`, parameter name, and `=` must fit the reserved URI prefix.
const _: () = assert!(MAX_ENDPOINT_LENGTH + MAX_QUERY_PARAM_LENGTH + 2 <= REQUEST_URI_PREFIX_BYTES);
/// Maximum user agent length.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;
/// Minimum per-request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 100;
/// Maximum per-request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 120_000;
/// Minimum response body limit in bytes.
pub(crate) const MIN_RESPONSE_BYTES: usize = 1024;
/// Maximum response body limit in bytes.
pub(crate) const MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Maximum scenarios in flight.
pub(crate) const MAX_CONCURRENCY: usize = 64;
/// Maximum attempts per scenario.
pub(crate) const MAX_ATTEMPTS: u32 = 10;
/// Maximum retry backoff unit in milliseconds.
pub(crate) const MAX_RETRY_BASE_DELAY_MS: u64 = 10_000;
/// Maximum abort threshold.
pub(crate) const MAX_ABORT_THRESHOLD: u32 = 1_000;
/// Maximum number of highlight markers.
pub(crate) const MAX_HIGHLIGHT_MARKERS: usize = 16;
/// Maximum highlight marker length.
pub(crate) const MAX_HIGHLIGHT_MARKER_LENGTH: usize = 64;
/// Maximum scenario ids per include or exclude list.
pub(crate) const MAX_SELECTION_ENTRIES: usize = 256;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration for the conformance suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConformanceConfig {
    /// Target service configuration.
    #[serde(default)]
    pub target: TargetConfig,
    /// Request limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Runner configuration.
    #[serde(default)]
    pub runner: RunnerSection,
    /// Normalizer configuration.
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// Catalog configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Path the configuration was loaded from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl SearchConformanceConfig {
    /// Loads configuration using the default resolution rules and applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_path(path)? {
            Some(resolved) => Self::from_file(&resolved)?,
            None => Self::default(),
        };
        config.apply_overrides(&EnvOverrides::load()?);
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration file without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml(content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides in place.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) {
        if let Some(endpoint) = &overrides.endpoint {
            self.target.endpoint.clone_from(endpoint);
        }
        if let Some(timeout_ms) = overrides.request_timeout_ms {
            self.limits.request_timeout_ms = timeout_ms;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.runner.concurrency = concurrency;
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target.validate()?;
        self.limits.validate()?;
        self.runner.validate()?;
        self.normalizer.validate()?;
        self.catalog.validate()?;
        Ok(())
    }

    /// Returns the parsed endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the endpoint is invalid.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        self.target.endpoint_url()
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.limits.request_timeout_ms)
    }

    /// Builds the runner configuration.
    #[must_use]
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            concurrency: self.runner.concurrency,
            request_timeout: self.request_timeout(),
            retry: RetryPolicy {
                max_attempts: self.runner.max_attempts,
                base_delay: Duration::from_millis(self.runner.retry_base_delay_ms),
            },
            abort_after_transport_failures: self.runner.abort_after_transport_failures,
            markers: HighlightMarkers::new(&self.normalizer.highlight_markers),
        }
    }

    /// Builds the catalog options.
    #[must_use]
    pub const fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            oversized_query_chars: self.catalog.oversized_query_chars,
            oversized_seed: self.catalog.oversized_seed,
        }
    }

    /// Builds the configured scenario selection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a feature tag is unknown.
    pub fn selection(&self) -> Result<ScenarioSelection, ConfigError> {
        self.catalog.selection()
    }
}

// ============================================================================
// SECTION: Target
// ============================================================================

/// Search service target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Search endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Query parameter carrying the query text.
    #[serde(default = "default_query_param")]
    pub query_param: String,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Allow cleartext HTTP endpoints.
    #[serde(default)]
    pub allow_http: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            query_param: default_query_param(),
            user_agent: default_user_agent(),
            allow_http: false,
        }
    }
}

impl TargetConfig {
    /// Validates target settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        let param = self.query_param.trim();
        if param.is_empty() || param.len() > MAX_QUERY_PARAM_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "target.query_param must be 1..={MAX_QUERY_PARAM_LENGTH} characters"
            )));
        }
        if !param.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-') {
            return Err(ConfigError::Invalid(
                "target.query_param must be ascii alphanumeric, '_' or '-'".to_string(),
            ));
        }
        let agent = self.user_agent.trim();
        if agent.is_empty() || agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "target.user_agent must be 1..={MAX_USER_AGENT_LENGTH} characters"
            )));
        }
        if !agent.bytes().all(|byte| byte.is_ascii_graphic() || byte == b' ') {
            return Err(ConfigError::Invalid(
                "target.user_agent must be printable ascii".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and checks the endpoint URL.
    fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let raw = self.endpoint.trim();
        if raw.is_empty() {
            return Err(ConfigError::Invalid("target.endpoint must be non-empty".to_string()));
        }
        if raw.len() > MAX_ENDPOINT_LENGTH {
            return Err(ConfigError::Invalid("target.endpoint exceeds max length".to_string()));
        }
        let url = Url::parse(raw)
            .map_err(|err| ConfigError::Invalid(format!("target.endpoint is invalid: {err}")))?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http => {}
            "http" => {
                return Err(ConfigError::Invalid(
                    "target.endpoint uses http; set target.allow_http = true to permit cleartext"
                        .to_string(),
                ));
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "target.endpoint scheme {other} is not supported"
                )));
            }
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::Invalid("target.endpoint must include a host".to_string()));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ConfigError::Invalid(
                "target.endpoint must not embed credentials".to_string(),
            ));
        }
        if url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "target.endpoint must not include a fragment".to_string(),
            ));
        }
        Ok(url)
    }
}

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Request limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl LimitsConfig {
    /// Validates request limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout_range(
            "limits.request_timeout_ms",
            self.request_timeout_ms,
            MIN_REQUEST_TIMEOUT_MS,
            MAX_REQUEST_TIMEOUT_MS,
        )?;
        if self.max_response_bytes < MIN_RESPONSE_BYTES
            || self.max_response_bytes > MAX_RESPONSE_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "limits.max_response_bytes must be between {MIN_RESPONSE_BYTES} and \
                 {MAX_RESPONSE_BYTES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Maximum scenarios in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Maximum attempts per scenario, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Linear backoff unit in milliseconds.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Consecutive transport failures that abort the suite; zero disables.
    #[serde(default = "default_abort_after_transport_failures")]
    pub abort_after_transport_failures: u32,
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            abort_after_transport_failures: default_abort_after_transport_failures(),
        }
    }
}

impl RunnerSection {
    /// Validates runner settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::Invalid(format!(
                "runner.concurrency must be between 1 and {MAX_CONCURRENCY}"
            )));
        }
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS {
            return Err(ConfigError::Invalid(format!(
                "runner.max_attempts must be between 1 and {MAX_ATTEMPTS}"
            )));
        }
        if self.retry_base_delay_ms > MAX_RETRY_BASE_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "runner.retry_base_delay_ms must be at most {MAX_RETRY_BASE_DELAY_MS}"
            )));
        }
        if self.abort_after_transport_failures > MAX_ABORT_THRESHOLD {
            return Err(ConfigError::Invalid(format!(
                "runner.abort_after_transport_failures must be at most {MAX_ABORT_THRESHOLD}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Normalizer
// ============================================================================

/// Normalizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Highlight markers stripped from result text.
    #[serde(default = "default_highlight_markers")]
    pub highlight_markers: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            highlight_markers: default_highlight_markers(),
        }
    }
}

impl NormalizerConfig {
    /// Validates highlight markers.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.highlight_markers.len() > MAX_HIGHLIGHT_MARKERS {
            return Err(ConfigError::Invalid(format!(
                "normalizer.highlight_markers must contain at most {MAX_HIGHLIGHT_MARKERS} entries"
            )));
        }
        for marker in &self.highlight_markers {
            if marker.is_empty() || marker.len() > MAX_HIGHLIGHT_MARKER_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "normalizer.highlight_markers entries must be 1..={MAX_HIGHLIGHT_MARKER_LENGTH} \
                     characters"
                )));
            }
            if !marker.is_ascii() {
                return Err(ConfigError::Invalid(
                    "normalizer.highlight_markers entries must be ascii".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Length of the oversized query in characters.
    #[serde(default = "default_oversized_query_chars")]
    pub oversized_query_chars: usize,
    /// Seed for the oversized payload.
    #[serde(default = "default_oversized_seed")]
    pub oversized_seed: u64,
    /// Scenario ids to include.
    #[serde(default)]
    pub include: Vec<String>,
    /// Scenario ids to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Feature tags to include.
    #[serde(default)]
    pub features: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            oversized_query_chars: default_oversized_query_chars(),
            oversized_seed: default_oversized_seed(),
            include: Vec::new(),
            exclude: Vec::new(),
            features: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Validates catalog settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.oversized_query_chars == 0
            || self.oversized_query_chars > MAX_OVERSIZED_QUERY_CHARS
        {
            return Err(ConfigError::Invalid(format!(
                "catalog.oversized_query_chars must be between 1 and {MAX_OVERSIZED_QUERY_CHARS}"
            )));
        }
        validate_id_list("catalog.include", &self.include)?;
        validate_id_list("catalog.exclude", &self.exclude)?;
        self.selection().map(|_| ())
    }

    /// Builds the scenario selection.
    fn selection(&self) -> Result<ScenarioSelection, ConfigError> {
        let features = self
            .features
            .iter()
            .map(|label| {
                label.parse::<FeatureTag>().map_err(|err| {
                    ConfigError::Invalid(format!("catalog.features: {err}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScenarioSelection {
            include_ids: self.include.iter().map(|id| ScenarioId::new(id.trim())).collect(),
            exclude_ids: self.exclude.iter().map(|id| ScenarioId::new(id.trim())).collect(),
            features,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI, environment, or the default file.
///
/// Returns `None` when no path was requested and the default file is absent.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = read_env_nonempty(CONFIG_ENV_VAR)? {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a timeout value against an inclusive range.
fn validate_timeout_range(
    field: &str,
    value_ms: u64,
    min_ms: u64,
    max_ms: u64,
) -> Result<(), ConfigError> {
    if value_ms < min_ms || value_ms > max_ms {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {min_ms} and {max_ms} milliseconds",
        )));
    }
    Ok(())
}

/// Validates a scenario id list.
fn validate_id_list(field: &str, ids: &[String]) -> Result<(), ConfigError> {
    if ids.len() > MAX_SELECTION_ENTRIES {
        return Err(ConfigError::Invalid(format!(
            "{field} must contain at most {MAX_SELECTION_ENTRIES} entries"
        )));
    }
    let mut seen = BTreeSet::new();
    for id in ids {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid(format!("{field} entries must be non-empty")));
        }
        if !seen.insert(trimmed) {
            return Err(ConfigError::Invalid(format!("{field} lists {trimmed} twice")));
        }
    }
    Ok(())
}

/// Default endpoint.
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Default query parameter.
fn default_query_param() -> String {
    DEFAULT_QUERY_PARAM.to_string()
}

/// Default user agent.
fn default_user_agent() -> String {
    format!("search-conformance/{}", env!("CARGO_PKG_VERSION"))
}

/// Default request timeout.
const fn default_request_timeout_ms() -> u64 {
    30_000
}

/// Default response body limit.
const fn default_max_response_bytes() -> usize {
    8 * 1024 * 1024
}

/// Default concurrency.
const fn default_concurrency() -> usize {
    4
}

/// Default attempt budget.
const fn default_max_attempts() -> u32 {
    3
}

/// Default backoff unit.
const fn default_retry_base_delay_ms() -> u64 {
    250
}

/// Default abort threshold.
const fn default_abort_after_transport_failures() -> u32 {
    3
}

/// Default highlight markers.
fn default_highlight_markers() -> Vec<String> {
    DEFAULT_HIGHLIGHT_MARKERS.iter().map(ToString::to_string).collect()
}

/// Default oversized query length.
const fn default_oversized_query_chars() -> usize {
    DEFAULT_OVERSIZED_QUERY_CHARS
}

/// Default oversized payload seed.
const fn default_oversized_seed() -> u64 {
    DEFAULT_OVERSIZED_SEED
}

// ============================================================================
// SECTION: Tests
// ============================================================================
