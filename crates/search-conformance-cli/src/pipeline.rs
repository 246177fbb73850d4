// crates/search-conformance-cli/src/pipeline.rs
// ============================================================================
// Module: Suite Pipeline
// Description: Wires config, catalog, transport, and runner together.
// Purpose: Share the run pipeline between the binary and system tests.
// Dependencies: search-conformance-{config,core,http}, tracing
// ============================================================================

//! ## Overview
//! The pipeline turns a validated [`SearchConformanceConfig`] plus
//! command-line overrides into a selected catalog and a configured runner.
//! [`run_suite`] uses the HTTP transport; [`run_suite_with`] accepts any
//! [`SearchTransport`] so stubs can drive the same path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use search_conformance_config::ConfigError;
use search_conformance_config::SearchConformanceConfig;
use search_conformance_core::CatalogError;
use search_conformance_core::RunnerError;
use search_conformance_core::ScenarioCatalog;
use search_conformance_core::SearchTransport;
use search_conformance_core::SuiteReport;
use search_conformance_core::SuiteRunner;
use search_conformance_core::TransportError;
use search_conformance_core::reference_catalog;
use search_conformance_http::HttpSearchTransport;
use search_conformance_http::HttpTransportConfig;
use thiserror::Error;
use tracing::info;

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Command-line overrides applied on top of the loaded config.
///
/// Non-empty lists replace the corresponding config lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    /// Endpoint override.
    pub endpoint: Option<String>,
    /// Scenario ids to include.
    pub scenarios: Vec<String>,
    /// Feature tags to include.
    pub features: Vec<String>,
    /// Scenario ids to exclude.
    pub excludes: Vec<String>,
    /// Concurrency override.
    pub concurrency: Option<usize>,
}

impl RunOverrides {
    /// Applies the overrides and revalidates the config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the overridden config is invalid.
    pub fn apply(&self, config: &mut SearchConformanceConfig) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            config.target.endpoint.clone_from(endpoint);
        }
        if let Some(concurrency) = self.concurrency {
            config.runner.concurrency = concurrency;
        }
        if !self.scenarios.is_empty() {
            config.catalog.include.clone_from(&self.scenarios);
        }
        if !self.features.is_empty() {
            config.catalog.features.clone_from(&self.features);
        }
        if !self.excludes.is_empty() {
            config.catalog.exclude.clone_from(&self.excludes);
        }
        config.validate()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while assembling or running the suite.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Catalog construction or selection failure.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Transport construction failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Runner construction failure.
    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Builds the selected catalog for a config.
///
/// # Errors
///
/// Returns [`PipelineError`] when the catalog cannot be built or a selected
/// id is unknown.
pub fn build_catalog(config: &SearchConformanceConfig) -> Result<ScenarioCatalog, PipelineError> {
    let catalog = reference_catalog(&config.catalog_options())?;
    let selection = config.selection()?;
    if selection.is_all() {
        return Ok(catalog);
    }
    Ok(catalog.select(&selection)?)
}

/// Builds the HTTP transport configuration for a config.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] when the endpoint is invalid.
pub fn transport_config(
    config: &SearchConformanceConfig,
) -> Result<HttpTransportConfig, PipelineError> {
    Ok(HttpTransportConfig {
        endpoint: config.endpoint_url()?,
        query_param: config.target.query_param.trim().to_string(),
        user_agent: config.target.user_agent.trim().to_string(),
        timeout: config.request_timeout(),
        max_response_bytes: config.limits.max_response_bytes,
    })
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs the selected suite against the configured HTTP endpoint.
///
/// # Errors
///
/// Returns [`PipelineError`] when the suite cannot be assembled. Scenario
/// failures are reported in the [`SuiteReport`], not as errors.
pub async fn run_suite(config: &SearchConformanceConfig) -> Result<SuiteReport, PipelineError> {
    let transport = HttpSearchTransport::new(transport_config(config)?)?;
    info!(endpoint = %transport.config().endpoint, "using http transport");
    run_suite_with(config, Arc::new(transport)).await
}

/// Runs the selected suite over an arbitrary transport.
///
/// # Errors
///
/// Returns [`PipelineError`] when the suite cannot be assembled.
pub async fn run_suite_with<T>(
    config: &SearchConformanceConfig,
    transport: Arc<T>,
) -> Result<SuiteReport, PipelineError>
where
    T: SearchTransport + ?Sized + 'static,
{
    let catalog = build_catalog(config)?;
    let runner = SuiteRunner::new(transport, config.runner_config())?;
    info!(scenarios = catalog.len(), "starting conformance suite");
    Ok(runner.run(&catalog).await)
}
