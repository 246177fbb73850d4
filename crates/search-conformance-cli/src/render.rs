// crates/search-conformance-cli/src/render.rs
// ============================================================================
// Module: Text Rendering
// Description: Human-readable lines for verdicts, summaries, and the catalog.
// Purpose: Keep CLI text output deterministic and testable.
// Dependencies: search-conformance-core
// ============================================================================

//! ## Overview
//! One line per verdict, one summary line per run, and one line per catalog
//! entry. Query previews are bounded so oversized payloads stay readable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use search_conformance_core::Scenario;
use search_conformance_core::SuiteReport;
use search_conformance_core::Verdict;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum query preview length in characters.
pub const PREVIEW_CHARS: usize = 60;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders one verdict as a single line.
#[must_use]
pub fn verdict_line(verdict: &Verdict) -> String {
    let mut line = format!(
        "{:<9} {} [{}] attempts={} elapsed_ms={}",
        verdict.status_label().to_ascii_uppercase(),
        verdict.scenario_id,
        verdict.feature,
        verdict.attempts,
        verdict.elapsed_ms,
    );
    if let Some(kind) = verdict.failure_kind() {
        line.push_str(" kind=");
        line.push_str(kind.as_str());
    }
    if let Some(diagnostic) = &verdict.diagnostic {
        line.push_str(": ");
        line.push_str(diagnostic);
    }
    line
}

/// Renders the run summary line.
#[must_use]
pub fn summary_line(report: &SuiteReport) -> String {
    let summary = &report.summary;
    format!(
        "{}: {} of {} passed ({} failed, {} soft, {} cancelled) in {} ms",
        if report.passed { "PASS" } else { "FAIL" },
        summary.passed,
        summary.total,
        summary.failed,
        summary.soft_failed,
        summary.cancelled,
        report.duration_ms,
    )
}

/// Renders one catalog entry.
#[must_use]
pub fn catalog_line(scenario: &Scenario) -> String {
    format!(
        "{:<30} {:<16} {}",
        scenario.id().as_str(),
        scenario.query().feature().as_str(),
        scenario.query().preview(PREVIEW_CHARS),
    )
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
