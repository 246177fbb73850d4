// crates/search-conformance-core/src/oracle/mod.rs
// ============================================================================
// Module: Conformance Oracle
// Description: Rules deciding whether results honor the query grammar.
// Purpose: Group patterns, matchers, expectation trees, and rules.
// Dependencies: crate::normalize, regex, smallvec
// ============================================================================

//! ## Overview
//! The oracle is pure: rules never perform I/O, never panic on well-formed
//! input, and report violations as values. Pattern compilation happens when
//! rules are built, not when they are evaluated.

pub mod expectation;
pub mod matcher;
pub mod pattern;
pub mod rule;

pub use expectation::Expectation;
pub use matcher::CaseMode;
pub use matcher::RecordMatcher;
pub use matcher::RecordPredicate;
pub use pattern::PatternError;
pub use pattern::PhraseTerm;
pub use pattern::ProximityPattern;
pub use pattern::WhitespaceGap;
pub use pattern::WildcardPattern;
pub use rule::MAX_OFFENDERS;
pub use rule::Observation;
pub use rule::OracleRule;
pub use rule::RuleOutcome;
pub use rule::Violation;
