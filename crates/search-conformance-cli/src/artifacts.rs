// crates/search-conformance-cli/src/artifacts.rs
// ============================================================================
// Module: Report Artifacts
// Description: Writes suite reports to a report directory.
// Purpose: Persist canonical JSON and Markdown summaries of a run.
// Dependencies: search-conformance-core, serde_jcs
// ============================================================================

//! ## Overview
//! A report directory receives `summary.json` (RFC 8785 canonical JSON) and
//! `summary.md`. Existing files are overwritten; the directory is created
//! when missing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use search_conformance_core::SuiteReport;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON summary filename.
pub const SUMMARY_JSON: &str = "summary.json";
/// Markdown summary filename.
pub const SUMMARY_MD: &str = "summary.md";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Paths written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// JSON summary path.
    pub json: PathBuf,
    /// Markdown summary path.
    pub markdown: PathBuf,
}

/// Errors raised while writing report artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Report serialization failed.
    #[error("failed to serialize report: {0}")]
    Serialize(String),
    /// Filesystem write failed.
    #[error("failed to write {path}: {message}")]
    Io {
        /// Target path.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

// ============================================================================
// SECTION: Writers
// ============================================================================

/// Renders the canonical JSON bytes of a report.
///
/// # Errors
///
/// Returns [`ArtifactError::Serialize`] when canonicalization fails.
pub fn report_json_bytes(report: &SuiteReport) -> Result<Vec<u8>, ArtifactError> {
    serde_jcs::to_vec(report).map_err(|err| ArtifactError::Serialize(err.to_string()))
}

/// Writes `summary.json` and `summary.md` into `dir`.
///
/// # Errors
///
/// Returns [`ArtifactError`] when serialization or a write fails.
pub fn write_report(dir: &Path, report: &SuiteReport) -> Result<ReportPaths, ArtifactError> {
    fs::create_dir_all(dir).map_err(|err| io_error(dir, &err))?;
    let paths = ReportPaths {
        json: dir.join(SUMMARY_JSON),
        markdown: dir.join(SUMMARY_MD),
    };
    let mut json = report_json_bytes(report)?;
    json.push(b'\n');
    fs::write(&paths.json, json).map_err(|err| io_error(&paths.json, &err))?;
    fs::write(&paths.markdown, report.to_markdown())
        .map_err(|err| io_error(&paths.markdown, &err))?;
    Ok(paths)
}

/// Builds an I/O error for a path.
fn io_error(path: &Path, err: &std::io::Error) -> ArtifactError {
    ArtifactError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
