// system-tests/tests/suites/nonconforming.rs
// ============================================================================
// Module: Non-Conforming Service Tests
// Description: End-to-end runs against a service that breaks the grammar.
// Purpose: Validate failures are classified and offending records reported.
// Dependencies: system-tests helpers, search-conformance-cli
// ============================================================================

//! ## Overview
//! The stub ignores `NOT`, matches a nonsense token, echoes markup, and
//! accepts an oversized query. Each defect must surface as a blocking
//! failure of the matching scenario and nowhere else.

use std::fs;

use search_conformance_cli::run_suite;
use search_conformance_core::FailureKind;
use search_conformance_core::SuiteReport;
use search_conformance_core::Verdict;

use crate::helpers;
use helpers::artifacts::TestReporter;
use helpers::artifacts::TestStatus;
use helpers::fixtures;
use helpers::fixtures::LEAKED_RECORD_ID;
use helpers::harness::stub_config;
use helpers::search_stub::SearchStub;

/// Finds a verdict by scenario id.
fn verdict<'a>(report: &'a SuiteReport, id: &str) -> Result<&'a Verdict, String> {
    report
        .verdicts
        .iter()
        .find(|verdict| verdict.scenario_id.as_str() == id)
        .ok_or_else(|| format!("verdict {id} missing"))
}

/// Requires a verdict to fail with the given kind.
fn require_failure(report: &SuiteReport, id: &str, kind: FailureKind) -> Result<(), String> {
    let verdict = verdict(report, id)?;
    if verdict.failure_kind() != Some(kind) {
        return Err(format!("{id} should fail as {}, got {}", kind.as_str(), verdict.status_label()));
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn defects_fail_their_scenarios() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("defects_fail_their_scenarios")?;
    let stub = SearchStub::new(fixtures::nonconforming()).spawn()?;
    let config = stub_config(stub.endpoint())?;

    let report = run_suite(&config).await?;
    let artifacts = reporter.artifacts().write_suite_report(&report)?;

    if report.passed {
        return Err("non-conforming service must fail the suite".into());
    }
    require_failure(&report, "boolean.not", FailureKind::Assertion)?;
    require_failure(&report, "negative.nonsense_token", FailureKind::Assertion)?;
    require_failure(&report, "security.html_injection", FailureKind::Assertion)?;
    require_failure(&report, "security.oversized_input", FailureKind::UnexpectedStatus)?;
    let mut blocking: Vec<&str> =
        report.blocking().map(|verdict| verdict.scenario_id.as_str()).collect();
    blocking.sort_unstable();
    let expected = [
        "boolean.not",
        "negative.nonsense_token",
        "security.html_injection",
        "security.oversized_input",
    ];
    if blocking != expected {
        return Err(format!("unexpected blocking set: {}", blocking.join(", ")).into());
    }

    let not_verdict = verdict(&report, "boolean.not")?;
    if not_verdict.offending.len() != 1 || not_verdict.offending[0].id != LEAKED_RECORD_ID {
        return Err("boolean.not should list only the leaked record".into());
    }
    let diagnostic = not_verdict.diagnostic.as_deref().unwrap_or_default();
    if !diagnostic.contains("плотник") {
        return Err(format!("diagnostic should name the excluded term: {diagnostic}").into());
    }

    reporter.finish(
        TestStatus::Pass,
        vec!["each injected defect failed exactly its scenario".to_string()],
        artifacts,
    )?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn report_lists_offending_records() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("report_lists_offending_records")?;
    let stub = SearchStub::new(fixtures::nonconforming()).spawn()?;
    let mut config = stub_config(stub.endpoint())?;
    config.catalog.include = vec!["boolean.not".to_string()];
    config.validate()?;

    let report = run_suite(&config).await?;
    let artifacts = reporter.artifacts().write_suite_report(&report)?;

    let markdown = fs::read_to_string(reporter.artifacts().report_dir().join("summary.md"))?;
    if !markdown.contains("## Offending Records") || !markdown.contains(LEAKED_RECORD_ID) {
        return Err("summary.md should list the offending record".into());
    }
    let json: serde_json::Value =
        serde_json::from_slice(&fs::read(reporter.artifacts().report_dir().join("summary.json"))?)?;
    if json["passed"] != serde_json::Value::Bool(false) {
        return Err("summary.json should record a failed run".into());
    }
    if json["verdicts"][0]["outcome"]["kind"] != "assertion" {
        return Err("summary.json should classify the failure as an assertion".into());
    }

    reporter.finish(TestStatus::Pass, vec!["report artifacts carry offenders".to_string()], artifacts)?;
    Ok(())
}
