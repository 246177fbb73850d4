// system-tests/tests/suites/cli.rs
// ============================================================================
// Module: CLI Tests
// Description: Drives the search-conformance binary against the stub service.
// Purpose: Validate exit codes, stdout contracts, and report files.
// Dependencies: system-tests helpers, tempfile, serde_json
// ============================================================================

//! ## Overview
//! Drives the search-conformance binary against the stub service.
//! Invariants:
//! - The binary exits successfully only when no blocking verdict failed.
//! - Results go to stdout; diagnostics go to stderr.

use std::fs;
use std::path::Path;

use crate::helpers;
use helpers::artifacts::TestReporter;
use helpers::artifacts::TestStatus;
use helpers::cli::cli_binary;
use helpers::cli::run_cli;
use helpers::fixtures;
use helpers::harness::STUB_MAX_QUERY_CHARS;
use helpers::harness::stub_config_toml;
use helpers::search_stub::SearchStub;

/// Writes a stub config file and returns its path as a string.
fn write_config(dir: &Path, endpoint: &str) -> Result<String, String> {
    let path = dir.join("search-conformance.toml");
    fs::write(&path, stub_config_toml(endpoint)).map_err(|err| err.to_string())?;
    path.to_str().map(ToString::to_string).ok_or_else(|| "non-UTF-8 temp path".to_string())
}

#[test]
fn run_against_conforming_service_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("run_against_conforming_service_exits_zero")?;
    let binary = cli_binary().ok_or("search-conformance binary unavailable")?;
    let stub =
        SearchStub::new(fixtures::conforming()).max_query_chars(STUB_MAX_QUERY_CHARS).spawn()?;
    let temp = tempfile::tempdir()?;
    let config = write_config(temp.path(), stub.endpoint())?;
    let report_dir = reporter.artifacts().report_dir();
    let report_arg = report_dir.to_str().ok_or("non-UTF-8 report path")?;

    let output = run_cli(&binary, &["run", "--config", &config, "--report", report_arg])?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    reporter.artifacts().write_text("stdout.txt", &stdout)?;
    reporter.artifacts().write_text("stderr.txt", &String::from_utf8_lossy(&output.stderr))?;

    if !output.status.success() {
        return Err(format!("run should exit zero, stdout:\n{stdout}").into());
    }
    if !stdout.lines().any(|line| line.starts_with("PASS: 18 of 18 passed")) {
        return Err("stdout should end with a passing summary line".into());
    }
    if stdout.lines().filter(|line| line.starts_with("PASS ")).count() != 18 {
        return Err("stdout should carry one verdict line per scenario".into());
    }
    if !report_dir.join("summary.json").is_file() || !report_dir.join("summary.md").is_file() {
        return Err("report files were not written".into());
    }

    reporter.finish(
        TestStatus::Pass,
        vec!["binary passed the conforming stub".to_string()],
        vec!["stdout.txt".to_string(), "stderr.txt".to_string(), "report".to_string()],
    )?;
    Ok(())
}

#[test]
fn run_against_nonconforming_service_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("run_against_nonconforming_service_exits_nonzero")?;
    let binary = cli_binary().ok_or("search-conformance binary unavailable")?;
    let stub = SearchStub::new(fixtures::nonconforming()).spawn()?;
    let temp = tempfile::tempdir()?;
    let config = write_config(temp.path(), stub.endpoint())?;

    let output = run_cli(&binary, &["run", "--config", &config, "--format", "json"])?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    reporter.artifacts().write_text("stdout.json", &stdout)?;

    if output.status.success() {
        return Err("run should fail against a non-conforming service".into());
    }
    let report: serde_json::Value = serde_json::from_str(stdout.trim())?;
    if report["passed"] != serde_json::Value::Bool(false) {
        return Err("json report should record a failed run".into());
    }
    if report["summary"]["total"] != 18 {
        return Err("json report should cover the whole catalog".into());
    }

    let notes = vec!["binary exited non-zero".to_string()];
    reporter.finish(TestStatus::Pass, notes, vec!["stdout.json".to_string()])?;
    Ok(())
}

#[test]
fn scenario_flag_narrows_the_run() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("scenario_flag_narrows_the_run")?;
    let binary = cli_binary().ok_or("search-conformance binary unavailable")?;
    let stub = SearchStub::new(fixtures::nonconforming()).spawn()?;
    let temp = tempfile::tempdir()?;
    let config = write_config(temp.path(), stub.endpoint())?;

    let output = run_cli(&binary, &["run", "--config", &config, "--scenario", "boolean.or"])?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();

    if !output.status.success() {
        return Err(format!("boolean.or alone should pass, stdout:\n{stdout}").into());
    }
    if stub.requests() != ["столяр OR плотник"] {
        return Err("only the selected scenario should reach the service".into());
    }

    let notes = vec!["--scenario limits requests".to_string()];
    reporter.finish(TestStatus::Pass, notes, Vec::new())?;
    Ok(())
}

#[test]
fn list_and_config_validate_succeed_offline() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("list_and_config_validate_succeed_offline")?;
    let binary = cli_binary().ok_or("search-conformance binary unavailable")?;
    let temp = tempfile::tempdir()?;
    let config = write_config(temp.path(), "http://127.0.0.1:9/vacancies")?;

    let list = run_cli(&binary, &["list", "--config", &config, "--format", "json"])?;
    if !list.status.success() {
        return Err("list should succeed".into());
    }
    let entries: serde_json::Value = serde_json::from_slice(&list.stdout)?;
    if entries.as_array().map(Vec::len) != Some(18) {
        return Err("list should print all 18 scenarios".into());
    }

    let validate = run_cli(&binary, &["config", "validate", "--config", &config])?;
    let stdout = String::from_utf8_lossy(&validate.stdout).to_string();
    if !validate.status.success() || !stdout.starts_with("config ok (") {
        return Err(format!("config validate should succeed, got: {stdout}").into());
    }

    let bad = temp.path().join("bad.toml");
    fs::write(&bad, "[target]\nendpoint = \"ftp://example.test/\"\n")?;
    let bad_arg = bad.to_str().ok_or("non-UTF-8 temp path")?;
    let rejected = run_cli(&binary, &["config", "validate", "--config", bad_arg])?;
    if rejected.status.success() {
        return Err("unsupported scheme should be rejected".into());
    }

    reporter.finish(TestStatus::Pass, vec!["offline commands behave".to_string()], Vec::new())?;
    Ok(())
}
