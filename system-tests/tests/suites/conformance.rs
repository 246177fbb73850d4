// system-tests/tests/suites/conformance.rs
// ============================================================================
// Module: Conformance Tests
// Description: End-to-end runs against a service that honors the grammar.
// Purpose: Validate the full pipeline passes a conforming service over HTTP.
// Dependencies: system-tests helpers, search-conformance-cli
// ============================================================================

//! ## Overview
//! End-to-end runs against a service that honors the grammar.
//! Invariants:
//! - Every scenario sends exactly one request when the service is healthy.
//! - Highlight markers in fixtures never cause a false failure.

use search_conformance_cli::run_suite;
use search_conformance_core::FeatureTag;

use crate::helpers;
use helpers::artifacts::TestReporter;
use helpers::artifacts::TestStatus;
use helpers::fixtures;
use helpers::harness::STUB_MAX_QUERY_CHARS;
use helpers::harness::STUB_OVERSIZED_CHARS;
use helpers::harness::stub_config;
use helpers::search_stub::SearchStub;

#[tokio::test(flavor = "multi_thread")]
async fn conforming_service_passes_full_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("conforming_service_passes_full_catalog")?;
    let stub =
        SearchStub::new(fixtures::conforming()).max_query_chars(STUB_MAX_QUERY_CHARS).spawn()?;
    let config = stub_config(stub.endpoint())?;

    let report = run_suite(&config).await?;
    let artifacts = reporter.artifacts().write_suite_report(&report)?;

    if !report.passed {
        let blocking: Vec<String> =
            report.blocking().map(|verdict| verdict.scenario_id.to_string()).collect();
        return Err(format!("conforming service failed: {}", blocking.join(", ")).into());
    }
    if report.summary.total != 18 || report.summary.passed != 18 {
        return Err(format!(
            "expected 18 passing verdicts, got {} of {}",
            report.summary.passed, report.summary.total
        )
        .into());
    }
    let requests = stub.requests();
    if requests.len() != 18 {
        return Err(format!("expected 18 requests, saw {}", requests.len()).into());
    }
    let oversized = report
        .verdicts
        .iter()
        .find(|verdict| verdict.feature == FeatureTag::OversizedInput)
        .ok_or("oversized verdict missing")?;
    if !oversized.is_pass() {
        return Err("oversized query should be rejected with 414".into());
    }
    if !requests.iter().any(|text| text.chars().count() == STUB_OVERSIZED_CHARS) {
        return Err("stub never received the full oversized payload".into());
    }

    reporter.finish(
        TestStatus::Pass,
        vec!["conforming stub passed all 18 scenarios".to_string()],
        artifacts,
    )?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn selection_limits_requests_to_chosen_scenarios() -> Result<(), Box<dyn std::error::Error>>
{
    let mut reporter = TestReporter::new("selection_limits_requests_to_chosen_scenarios")?;
    let stub = SearchStub::new(fixtures::conforming()).spawn()?;
    let mut config = stub_config(stub.endpoint())?;
    config.catalog.include = vec!["boolean.or".to_string(), "boolean.not".to_string()];
    config.catalog.exclude = vec!["boolean.not".to_string()];
    config.validate()?;

    let report = run_suite(&config).await?;

    let ids: Vec<&str> = report.verdicts.iter().map(|verdict| verdict.scenario_id.as_str()).collect();
    if ids != ["boolean.or"] {
        return Err(format!("unexpected verdicts: {}", ids.join(", ")).into());
    }
    if stub.requests() != ["столяр OR плотник"] {
        return Err("stub should see only the boolean.or query".into());
    }
    if !report.passed {
        return Err("selected scenario should pass".into());
    }

    reporter.finish(TestStatus::Pass, vec!["exclusion overrides inclusion".to_string()], Vec::new())?;
    Ok(())
}
