// crates/search-conformance-core/src/core/verdict.rs
// ============================================================================
// Module: Scenario Verdicts
// Description: Pass/fail outcomes with diagnostics and offending records.
// Purpose: Record exactly one classified outcome per executed scenario.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Verdict`] is the terminal result for one scenario. Failures carry a
//! [`FailureKind`] so transport problems are never confused with grammar
//! violations, and best-effort scenarios can fail softly without failing the
//! suite.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ScenarioId;
use crate::core::query::FeatureTag;

// ============================================================================
// SECTION: Classification
// ============================================================================

/// How strictly a scenario's assertions bind the suite result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Assertion failures fail the suite.
    #[default]
    Strict,
    /// Assertion failures are reported but do not fail the suite.
    BestEffort,
}

/// Category of a failed scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service could not be reached or kept failing transiently.
    Transport,
    /// The status was outside the scenario's expected set.
    UnexpectedStatus,
    /// The response lacked fields required by the scenario's rules.
    MalformedResponse,
    /// An oracle rule rejected the observed results.
    Assertion,
}

impl FailureKind {
    /// Returns the canonical snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::UnexpectedStatus => "unexpected_status",
            Self::MalformedResponse => "malformed_response",
            Self::Assertion => "assertion",
        }
    }
}

/// Outcome of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerdictOutcome {
    /// Every rule held.
    Pass,
    /// The scenario failed.
    Fail {
        /// Failure category.
        kind: FailureKind,
    },
    /// The scenario did not complete because the suite was aborted.
    Cancelled,
}

/// Record that violated a rule, kept for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffendingRecord {
    /// Record identifier.
    pub id: String,
    /// Record display name after normalization.
    pub name: String,
    /// Leading excerpt of the flattened text.
    pub excerpt: String,
    /// Why the record was rejected.
    pub reason: String,
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Terminal result for one scenario.
///
/// # Invariants
/// - `offending` is empty unless `outcome` is an assertion failure.
/// - A cancelled verdict is never counted as passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Scenario identifier.
    pub scenario_id: ScenarioId,
    /// Grammar feature the scenario exercises.
    pub feature: FeatureTag,
    /// Scenario strictness.
    pub strictness: Strictness,
    /// Classified outcome.
    pub outcome: VerdictOutcome,
    /// Human-readable diagnostic for failures and cancellations.
    pub diagnostic: Option<String>,
    /// Records that violated a rule.
    pub offending: Vec<OffendingRecord>,
    /// Number of transport attempts made.
    pub attempts: u32,
    /// Wall-clock time spent on the scenario, in milliseconds.
    pub elapsed_ms: u64,
}

impl Verdict {
    /// Creates a passing verdict.
    #[must_use]
    pub const fn pass(
        scenario_id: ScenarioId,
        feature: FeatureTag,
        strictness: Strictness,
        attempts: u32,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            scenario_id,
            feature,
            strictness,
            outcome: VerdictOutcome::Pass,
            diagnostic: None,
            offending: Vec::new(),
            attempts,
            elapsed_ms,
        }
    }

    /// Creates a failing verdict.
    #[must_use]
    pub fn fail(
        scenario_id: ScenarioId,
        feature: FeatureTag,
        strictness: Strictness,
        kind: FailureKind,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            scenario_id,
            feature,
            strictness,
            outcome: VerdictOutcome::Fail {
                kind,
            },
            diagnostic: Some(diagnostic.into()),
            offending: Vec::new(),
            attempts: 0,
            elapsed_ms: 0,
        }
    }

    /// Creates a cancelled verdict.
    #[must_use]
    pub fn cancelled(
        scenario_id: ScenarioId,
        feature: FeatureTag,
        strictness: Strictness,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            scenario_id,
            feature,
            strictness,
            outcome: VerdictOutcome::Cancelled,
            diagnostic: Some(reason.into()),
            offending: Vec::new(),
            attempts: 0,
            elapsed_ms: 0,
        }
    }

    /// Attaches offending records.
    #[must_use]
    pub fn with_offending(mut self, offending: Vec<OffendingRecord>) -> Self {
        self.offending = offending;
        self
    }

    /// Attaches attempt and timing metadata.
    #[must_use]
    pub const fn with_timing(mut self, attempts: u32, elapsed_ms: u64) -> Self {
        self.attempts = attempts;
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Returns true when every rule held.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self.outcome, VerdictOutcome::Pass)
    }

    /// Returns the failure kind for failed verdicts.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self.outcome {
            VerdictOutcome::Fail {
                kind,
            } => Some(kind),
            VerdictOutcome::Pass | VerdictOutcome::Cancelled => None,
        }
    }

    /// Returns true for transport failures.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        matches!(self.failure_kind(), Some(FailureKind::Transport))
    }

    /// Returns true when a best-effort scenario failed its assertions.
    #[must_use]
    pub const fn is_soft_failure(&self) -> bool {
        matches!(self.strictness, Strictness::BestEffort)
            && matches!(self.failure_kind(), Some(FailureKind::Assertion))
    }

    /// Returns true when this verdict fails the suite.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        match self.outcome {
            VerdictOutcome::Pass => false,
            VerdictOutcome::Cancelled => true,
            VerdictOutcome::Fail {
                ..
            } => !self.is_soft_failure(),
        }
    }

    /// Returns a short status label for reports.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        match self.outcome {
            VerdictOutcome::Pass => "pass",
            VerdictOutcome::Cancelled => "cancelled",
            VerdictOutcome::Fail {
                ..
            } => {
                if self.is_soft_failure() {
                    "soft_fail"
                } else {
                    "fail"
                }
            }
        }
    }
}
