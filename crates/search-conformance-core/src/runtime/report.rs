// crates/search-conformance-core/src/runtime/report.rs
// ============================================================================
// Module: Suite Report
// Description: Ordered verdicts with summary counts and the aggregate flag.
// Purpose: Provide the serializable result of a suite run.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! A [`SuiteReport`] lists verdicts in registry order. The suite passes only
//! when no verdict is blocking: best-effort assertion failures are counted as
//! soft failures, and cancelled scenarios always block.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Verdict;
use crate::core::VerdictOutcome;

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Verdict counts for a suite run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Scenarios executed or cancelled.
    pub total: usize,
    /// Passing scenarios.
    pub passed: usize,
    /// Blocking failures.
    pub failed: usize,
    /// Best-effort assertion failures.
    pub soft_failed: usize,
    /// Cancelled scenarios.
    pub cancelled: usize,
}

impl SuiteSummary {
    /// Tallies a list of verdicts.
    #[must_use]
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        let mut summary = Self {
            total: verdicts.len(),
            ..Self::default()
        };
        for verdict in verdicts {
            match verdict.outcome {
                VerdictOutcome::Pass => summary.passed += 1,
                VerdictOutcome::Cancelled => summary.cancelled += 1,
                VerdictOutcome::Fail {
                    ..
                } => {
                    if verdict.is_soft_failure() {
                        summary.soft_failed += 1;
                    } else {
                        summary.failed += 1;
                    }
                }
            }
        }
        summary
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Result of a suite run.
///
/// # Invariants
/// - `verdicts` follow registry order.
/// - `passed` is true only when no verdict is blocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Aggregate pass flag.
    pub passed: bool,
    /// Verdict counts.
    pub summary: SuiteSummary,
    /// Run start in Unix milliseconds.
    pub started_at_ms: u64,
    /// Wall-clock run duration in milliseconds.
    pub duration_ms: u64,
    /// Verdicts in registry order.
    pub verdicts: Vec<Verdict>,
}

impl SuiteReport {
    /// Builds a report from ordered verdicts.
    #[must_use]
    pub fn new(verdicts: Vec<Verdict>, started_at_ms: u64, duration_ms: u64) -> Self {
        let summary = SuiteSummary::from_verdicts(&verdicts);
        let passed = !verdicts.iter().any(Verdict::is_blocking);
        Self {
            passed,
            summary,
            started_at_ms,
            duration_ms,
            verdicts,
        }
    }

    /// Returns verdicts that fail the suite.
    pub fn blocking(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|verdict| verdict.is_blocking())
    }

    /// Renders a Markdown summary.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let status = if self.passed { "PASS" } else { "FAIL" };
        let _ = writeln!(out, "# Search Conformance Report\n");
        let _ = writeln!(out, "- Status: {status}");
        let _ = writeln!(
            out,
            "- Total: {} | Passed: {} | Failed: {} | Soft failed: {} | Cancelled: {}",
            self.summary.total,
            self.summary.passed,
            self.summary.failed,
            self.summary.soft_failed,
            self.summary.cancelled
        );
        let _ = writeln!(out, "- Duration: {} ms\n", self.duration_ms);
        let _ = writeln!(out, "| Scenario | Feature | Status | Attempts | Diagnostic |");
        let _ = writeln!(out, "| --- | --- | --- | --- | --- |");
        for verdict in &self.verdicts {
            let diagnostic = verdict.diagnostic.as_deref().map(escape_cell).unwrap_or_default();
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                verdict.scenario_id,
                verdict.feature,
                verdict.status_label(),
                verdict.attempts,
                diagnostic
            );
        }
        let offenders: Vec<&Verdict> =
            self.verdicts.iter().filter(|verdict| !verdict.offending.is_empty()).collect();
        if !offenders.is_empty() {
            let _ = writeln!(out, "\n## Offending Records\n");
            for verdict in offenders {
                let _ = writeln!(out, "### {}\n", verdict.scenario_id);
                for record in &verdict.offending {
                    let _ = writeln!(
                        out,
                        "- `{}` {}: {} ({})",
                        record.id,
                        escape_cell(&record.name),
                        record.reason,
                        escape_cell(&record.excerpt)
                    );
                }
                out.push('\n');
            }
        }
        out
    }
}

/// Escapes table separators and newlines for a Markdown cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}
