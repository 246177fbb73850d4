// crates/search-conformance-core/src/oracle/rule.rs
// ============================================================================
// Module: Oracle Rules
// Description: One rule per query grammar feature.
// Purpose: Decide whether observed results conform to a query's intent.
// Dependencies: crate::normalize, crate::oracle::{pattern, matcher, expectation}
// ============================================================================

//! ## Overview
//! Each [`OracleRule`] is a pure predicate over an [`Observation`]: the
//! status, raw body, reported match count, and normalized records of one
//! response. Per-record rules must hold for every record and pass vacuously
//! when the page is empty and the service reports no matches. Aggregate rules
//! (cardinality, echo absence, status, synonym) inspect the response as a
//! whole. Violations name the rule, the failing clause, and the first few
//! offending records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::OffendingRecord;
use crate::normalize::NormalizedRecord;
use crate::oracle::expectation::Expectation;
use crate::oracle::matcher::RecordMatcher;
use crate::oracle::pattern::ProximityPattern;
use crate::oracle::pattern::WildcardPattern;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum offending records attached to a violation.
pub const MAX_OFFENDERS: usize = 8;
/// Maximum characters of flattened text kept per offending record.
const EXCERPT_CHARS: usize = 160;

// ============================================================================
// SECTION: Observation & Outcome
// ============================================================================

/// Response data an oracle rule evaluates.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: &'a str,
    /// Reported total match count, when a page was decoded.
    pub found: Option<u64>,
    /// Normalized records of the page, in service order.
    pub records: &'a [NormalizedRecord],
}

/// Description of a rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the violated rule.
    pub rule: &'static str,
    /// Human-readable diagnostic naming the failing clause.
    pub diagnostic: String,
    /// First offending records, bounded by [`MAX_OFFENDERS`].
    pub offending: Vec<OffendingRecord>,
}

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule held.
    Pass,
    /// The rule was violated.
    Fail(Violation),
}

impl RuleOutcome {
    /// Returns true when the rule held.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Conformance rule for one grammar feature.
///
/// # Invariants
/// - Term strings are stored lowercased.
/// - Patterns are compiled before a rule is constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleRule {
    /// Every record contains the term.
    Term {
        /// Lowercased term.
        term: String,
    },
    /// Every record contains every word, in any order.
    MultiTerm {
        /// Lowercased words.
        terms: Vec<String>,
    },
    /// Every record matches the proximity phrase.
    Phrase(ProximityPattern),
    /// Every record contains the term or its declared stem.
    WordForms {
        /// Lowercased literal term.
        term: String,
        /// Lowercased stem accepted as a word form.
        stem: String,
    },
    /// Every record contains the exact literal term.
    ExactForm {
        /// Lowercased literal term.
        term: String,
    },
    /// Every record contains a word with the prefix.
    Wildcard(WildcardPattern),
    /// Some record contains a declared synonym of the queried term.
    Synonym {
        /// Lowercased queried term, used in diagnostics.
        term: String,
        /// Lowercased synonyms.
        synonyms: Vec<String>,
    },
    /// Every record contains at least one disjunct.
    AnyOf {
        /// Lowercased disjuncts.
        terms: Vec<String>,
    },
    /// Every conjunct rule holds.
    AllOf(Vec<OracleRule>),
    /// Every record contains the required term and no excluded term.
    Exclusion {
        /// Lowercased required term.
        required: String,
        /// Lowercased excluded terms.
        excluded: Vec<String>,
    },
    /// Every record satisfies a boolean expression over text matchers.
    Grouped(Expectation<RecordMatcher>),
    /// Every record satisfies a boolean expression over structured fields.
    FieldScoped(Expectation<RecordMatcher>),
    /// Reported count equals the expected value and the page is no larger.
    Cardinality {
        /// Expected total count.
        expected: u64,
    },
    /// The raw body never contains the payload verbatim.
    EchoAbsent {
        /// Literal payload.
        payload: String,
    },
    /// The status is one of the expected statuses.
    Status {
        /// Accepted statuses.
        expected: Vec<u16>,
    },
}

impl OracleRule {
    /// Creates a term containment rule.
    #[must_use]
    pub fn term(term: &str) -> Self {
        Self::Term {
            term: term.to_lowercase(),
        }
    }

    /// Creates a multi-term rule from the whitespace-separated words of `query`.
    #[must_use]
    pub fn multi_term(query: &str) -> Self {
        Self::MultiTerm {
            terms: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    /// Creates a word-form tolerance rule.
    #[must_use]
    pub fn word_forms(term: &str, stem: &str) -> Self {
        Self::WordForms {
            term: term.to_lowercase(),
            stem: stem.to_lowercase(),
        }
    }

    /// Creates an exact-form rule; a leading `!` is ignored.
    #[must_use]
    pub fn exact_form(term: &str) -> Self {
        Self::ExactForm {
            term: term.trim_start_matches('!').to_lowercase(),
        }
    }

    /// Creates a synonym expansion rule.
    #[must_use]
    pub fn synonym(term: &str, synonyms: &[&str]) -> Self {
        Self::Synonym {
            term: term.to_lowercase(),
            synonyms: lowercase_all(synonyms),
        }
    }

    /// Creates a disjunction rule.
    #[must_use]
    pub fn any_of(terms: &[&str]) -> Self {
        Self::AnyOf {
            terms: lowercase_all(terms),
        }
    }

    /// Creates an exclusion rule.
    #[must_use]
    pub fn exclusion(required: &str, excluded: &[&str]) -> Self {
        Self::Exclusion {
            required: required.to_lowercase(),
            excluded: lowercase_all(excluded),
        }
    }

    /// Creates an echo-absence rule.
    #[must_use]
    pub fn echo_absent(payload: impl Into<String>) -> Self {
        Self::EchoAbsent {
            payload: payload.into(),
        }
    }

    /// Creates a status rule.
    #[must_use]
    pub fn status(expected: &[u16]) -> Self {
        Self::Status {
            expected: expected.to_vec(),
        }
    }

    /// Returns the rule name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Term {
                ..
            } => "term",
            Self::MultiTerm {
                ..
            } => "multi_term",
            Self::Phrase(_) => "phrase",
            Self::WordForms {
                ..
            } => "word_forms",
            Self::ExactForm {
                ..
            } => "exact_form",
            Self::Wildcard(_) => "wildcard",
            Self::Synonym {
                ..
            } => "synonym",
            Self::AnyOf {
                ..
            } => "boolean_or",
            Self::AllOf(_) => "boolean_and",
            Self::Exclusion {
                ..
            } => "boolean_not",
            Self::Grouped(_) => "grouped",
            Self::FieldScoped(_) => "field_scoped",
            Self::Cardinality {
                ..
            } => "cardinality",
            Self::EchoAbsent {
                ..
            } => "echo_absent",
            Self::Status {
                ..
            } => "status",
        }
    }

    /// Returns true when the rule needs a decoded result page.
    #[must_use]
    pub const fn requires_page(&self) -> bool {
        !matches!(
            self,
            Self::EchoAbsent {
                ..
            } | Self::Status {
                ..
            }
        )
    }

    /// Evaluates the rule against an observation.
    #[must_use]
    pub fn evaluate(&self, observation: &Observation<'_>) -> RuleOutcome {
        match self {
            Self::Term {
                term,
            }
            | Self::ExactForm {
                term,
            } => per_record(self.name(), observation, |record| {
                missing(record, term).then(|| format!("missing \"{term}\""))
            }),
            Self::MultiTerm {
                terms,
            } => per_record(self.name(), observation, |record| {
                terms
                    .iter()
                    .find(|term| missing(record, term))
                    .map(|term| format!("missing \"{term}\""))
            }),
            Self::Phrase(pattern) => per_record(self.name(), observation, |record| {
                (!pattern.is_match(record.text())).then(|| format!("no match for /{pattern}/"))
            }),
            Self::WordForms {
                term,
                stem,
            } => per_record(self.name(), observation, |record| {
                (missing(record, term) && missing(record, stem))
                    .then(|| format!("neither \"{term}\" nor stem \"{stem}\""))
            }),
            Self::Wildcard(pattern) => per_record(self.name(), observation, |record| {
                (!pattern.is_match(record.text())).then(|| format!("no word matching {pattern}"))
            }),
            Self::Synonym {
                term,
                synonyms,
            } => evaluate_synonym(self.name(), observation, term, synonyms),
            Self::AnyOf {
                terms,
            } => per_record(self.name(), observation, |record| {
                terms
                    .iter()
                    .all(|term| missing(record, term))
                    .then(|| format!("none of {}", quote_list(terms)))
            }),
            Self::AllOf(conjuncts) => evaluate_conjunction(self.name(), observation, conjuncts),
            Self::Exclusion {
                required,
                excluded,
            } => per_record(self.name(), observation, |record| {
                if missing(record, required) {
                    return Some(format!("missing required \"{required}\""));
                }
                excluded
                    .iter()
                    .find(|term| !missing(record, term))
                    .map(|term| format!("contains excluded \"{term}\""))
            }),
            Self::Grouped(expectation) | Self::FieldScoped(expectation) => {
                per_record(self.name(), observation, |record| expectation.explain_failure(record))
            }
            Self::Cardinality {
                expected,
            } => evaluate_cardinality(self.name(), observation, *expected),
            Self::EchoAbsent {
                payload,
            } => {
                if observation.body.contains(payload.as_str()) {
                    fail(self.name(), format!("response body echoes payload \"{payload}\""))
                } else {
                    RuleOutcome::Pass
                }
            }
            Self::Status {
                expected,
            } => {
                if expected.contains(&observation.status) {
                    RuleOutcome::Pass
                } else {
                    let accepted: Vec<String> =
                        expected.iter().map(ToString::to_string).collect();
                    fail(
                        self.name(),
                        format!(
                            "status {} not in [{}]",
                            observation.status,
                            accepted.join(", ")
                        ),
                    )
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Evaluation Helpers
// ============================================================================

/// Returns true when the record's flattened text lacks `term`.
fn missing(record: &NormalizedRecord, term: &str) -> bool {
    !record.text().contains(term)
}

/// Applies a per-record check; `reject` returns a reason for failing records.
fn per_record<F>(rule: &'static str, observation: &Observation<'_>, reject: F) -> RuleOutcome
where
    F: Fn(&NormalizedRecord) -> Option<String>,
{
    if observation.records.is_empty() {
        return match observation.found {
            Some(found) if found > 0 => fail(
                rule,
                format!("service reported {found} matches but returned no records"),
            ),
            _ => RuleOutcome::Pass,
        };
    }
    let mut offending = Vec::new();
    let mut violations = 0_usize;
    let mut first_reason = None;
    for record in observation.records {
        if let Some(reason) = reject(record) {
            violations += 1;
            if first_reason.is_none() {
                first_reason = Some(reason.clone());
            }
            if offending.len() < MAX_OFFENDERS {
                offending.push(offending_record(record, reason));
            }
        }
    }
    match first_reason {
        None => RuleOutcome::Pass,
        Some(reason) => RuleOutcome::Fail(Violation {
            rule,
            diagnostic: format!(
                "{violations} of {} records violate {rule}: {reason}",
                observation.records.len()
            ),
            offending,
        }),
    }
}

/// Evaluates conjuncts in order; reports the first failing conjunct.
fn evaluate_conjunction(
    rule: &'static str,
    observation: &Observation<'_>,
    conjuncts: &[OracleRule],
) -> RuleOutcome {
    for (index, conjunct) in conjuncts.iter().enumerate() {
        if let RuleOutcome::Fail(violation) = conjunct.evaluate(observation) {
            return RuleOutcome::Fail(Violation {
                rule,
                diagnostic: format!(
                    "conjunct {} ({}) failed: {}",
                    index + 1,
                    violation.rule,
                    violation.diagnostic
                ),
                offending: violation.offending,
            });
        }
    }
    RuleOutcome::Pass
}

/// Requires some record to contain one of the synonyms; the literal term may
/// appear alongside it.
fn evaluate_synonym(
    rule: &'static str,
    observation: &Observation<'_>,
    term: &str,
    synonyms: &[String],
) -> RuleOutcome {
    if observation.records.is_empty() {
        return fail(rule, "no records returned to demonstrate synonym expansion".to_string());
    }
    let expanded = observation
        .records
        .iter()
        .any(|record| synonyms.iter().any(|synonym| !missing(record, synonym)));
    if expanded {
        RuleOutcome::Pass
    } else {
        fail(
            rule,
            format!(
                "no record matched \"{term}\" through synonyms {}",
                quote_list(synonyms)
            ),
        )
    }
}

/// Checks the reported count and page size against the expected count.
fn evaluate_cardinality(
    rule: &'static str,
    observation: &Observation<'_>,
    expected: u64,
) -> RuleOutcome {
    let Some(found) = observation.found else {
        return fail(rule, "response carried no result page".to_string());
    };
    let returned = u64::try_from(observation.records.len()).unwrap_or(u64::MAX);
    if found != expected {
        return fail_with(
            rule,
            format!("reported {found} matches, expected {expected}"),
            observation,
        );
    }
    if returned > expected {
        return fail_with(
            rule,
            format!("returned {returned} records, expected at most {expected}"),
            observation,
        );
    }
    RuleOutcome::Pass
}

/// Builds a failure without offending records.
fn fail(rule: &'static str, diagnostic: String) -> RuleOutcome {
    RuleOutcome::Fail(Violation {
        rule,
        diagnostic,
        offending: Vec::new(),
    })
}

/// Builds a failure listing the first records of the page.
fn fail_with(rule: &'static str, diagnostic: String, observation: &Observation<'_>) -> RuleOutcome {
    let offending = observation
        .records
        .iter()
        .take(MAX_OFFENDERS)
        .map(|record| offending_record(record, "unexpected record".to_string()))
        .collect();
    RuleOutcome::Fail(Violation {
        rule,
        diagnostic,
        offending,
    })
}

/// Captures a record for the report.
fn offending_record(record: &NormalizedRecord, reason: String) -> OffendingRecord {
    OffendingRecord {
        id: record.id().to_string(),
        name: record.name().to_string(),
        excerpt: record.text().chars().take(EXCERPT_CHARS).collect(),
        reason,
    }
}

/// Lowercases a list of terms.
fn lowercase_all(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|term| term.to_lowercase()).collect()
}

/// Renders terms as a quoted, comma-separated list.
fn quote_list(terms: &[String]) -> String {
    let quoted: Vec<String> = terms.iter().map(|term| format!("\"{term}\"")).collect();
    format!("[{}]", quoted.join(", "))
}
