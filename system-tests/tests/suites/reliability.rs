// system-tests/tests/suites/reliability.rs
// ============================================================================
// Module: Reliability Tests
// Description: Retry and early-abort behavior over real sockets.
// Purpose: Validate transient failures are retried and dead services abort the run.
// Dependencies: system-tests helpers, search-conformance-cli
// ============================================================================

//! ## Overview
//! Retry and early-abort behavior over real sockets.
//! Invariants:
//! - Transient 503 responses are retried within the attempt budget.
//! - Consecutive transport failures cancel the remaining scenarios.

use std::net::TcpListener;

use search_conformance_cli::run_suite;

use crate::helpers;
use helpers::artifacts::TestReporter;
use helpers::artifacts::TestStatus;
use helpers::fixtures;
use helpers::harness::STUB_MAX_QUERY_CHARS;
use helpers::harness::stub_config;
use helpers::search_stub::SEARCH_PATH;
use helpers::search_stub::SearchStub;

#[tokio::test(flavor = "multi_thread")]
async fn transient_server_errors_are_retried() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("transient_server_errors_are_retried")?;
    let stub = SearchStub::new(fixtures::conforming())
        .max_query_chars(STUB_MAX_QUERY_CHARS)
        .fail_first(2)
        .spawn()?;
    let config = stub_config(stub.endpoint())?;

    let report = run_suite(&config).await?;
    let artifacts = reporter.artifacts().write_suite_report(&report)?;

    if !report.passed {
        return Err("two transient 503s should be absorbed by retries".into());
    }
    let attempts: u32 = report.verdicts.iter().map(|verdict| verdict.attempts).sum();
    let requests = stub.requests().len();
    if attempts != 20 || requests != 20 {
        return Err(format!("expected 20 attempts and requests, got {attempts} and {requests}").into());
    }

    reporter.finish(TestStatus::Pass, vec!["503 responses retried".to_string()], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_service_aborts_remaining_scenarios() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("unreachable_service_aborts_remaining_scenarios")?;
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    let mut config = stub_config(&format!("http://{addr}{SEARCH_PATH}"))?;
    config.runner.concurrency = 1;
    config.runner.abort_after_transport_failures = 3;
    config.validate()?;

    let report = run_suite(&config).await?;
    let artifacts = reporter.artifacts().write_suite_report(&report)?;

    if report.passed {
        return Err("an unreachable service must fail the suite".into());
    }
    let transport_failures =
        report.verdicts.iter().filter(|verdict| verdict.is_transport_failure()).count();
    if transport_failures < 3 {
        return Err(format!("expected at least 3 transport failures, got {transport_failures}").into());
    }
    if report.summary.cancelled == 0
        || report.summary.cancelled + transport_failures != report.summary.total
    {
        return Err(format!(
            "remaining scenarios should be cancelled: {} cancelled of {}",
            report.summary.cancelled, report.summary.total
        )
        .into());
    }

    reporter.finish(
        TestStatus::Pass,
        vec![format!("aborted after {transport_failures} transport failures")],
        artifacts,
    )?;
    Ok(())
}
