// system-tests/tests/helpers/cli.rs
// ============================================================================
// Module: CLI Helpers
// Description: Shared helpers for locating and invoking the search-conformance CLI.
// Purpose: Provide consistent CLI binary resolution across system-test suites.
// Dependencies: std::process, std::path
// ============================================================================

//! Helpers for invoking the search-conformance CLI in system-tests.

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::sync::OnceLock;

/// Binary name produced by the CLI crate.
const BINARY_NAME: &str = "search-conformance";

/// Locates the CLI binary, building it if necessary.
pub fn cli_binary() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_search-conformance") {
        let candidate = PathBuf::from(path);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    build_cli_binary().map_or_else(|_| resolve_cli_from_current_exe(), Some)
}

/// Runs the CLI with arguments and returns the process output.
pub fn run_cli(binary: &Path, args: &[&str]) -> Result<Output, String> {
    Command::new(binary)
        .args(args)
        .env_remove("SEARCH_CONFORMANCE_CONFIG")
        .env_remove("SEARCH_CONFORMANCE_ENDPOINT")
        .env_remove("SEARCH_CONFORMANCE_TIMEOUT_MS")
        .env_remove("SEARCH_CONFORMANCE_CONCURRENCY")
        .output()
        .map_err(|err| format!("run {BINARY_NAME} failed: {err}"))
}

/// Resolves the binary next to the running test executable.
fn resolve_cli_from_current_exe() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let profile_dir = exe.parent()?.parent()?;
    let candidate = profile_dir.join(format!("{BINARY_NAME}{}", std::env::consts::EXE_SUFFIX));
    if candidate.exists() { Some(candidate) } else { None }
}

/// Resolves the target directory from the running test executable.
fn target_dir_from_current_exe() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let profile_dir = exe.parent()?.parent()?;
    profile_dir.parent().map(PathBuf::from)
}

/// Builds the CLI once per test process.
fn build_cli_binary() -> Result<PathBuf, String> {
    static BUILD_RESULT: OnceLock<Result<PathBuf, String>> = OnceLock::new();
    let result = BUILD_RESULT.get_or_init(|| {
        let Some(target_dir) = target_dir_from_current_exe() else {
            return Err("unable to resolve target dir from current exe".to_string());
        };
        let output = Command::new("cargo")
            .args(["build", "-p", "search-conformance-cli", "--bin", BINARY_NAME, "--target-dir"])
            .arg(&target_dir)
            .output()
            .map_err(|err| format!("spawn cargo build failed: {err}"))?;
        if !output.status.success() {
            return Err(format!(
                "cargo build search-conformance-cli failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }
        let candidate =
            target_dir.join("debug").join(format!("{BINARY_NAME}{}", std::env::consts::EXE_SUFFIX));
        if candidate.exists() {
            Ok(candidate)
        } else {
            Err(format!("{BINARY_NAME} binary not found after build"))
        }
    });
    result.clone()
}
