// crates/search-conformance-core/src/lib.rs
// ============================================================================
// Module: Search Conformance Core Library
// Description: Public API surface for the search conformance core.
// Purpose: Expose records, normalization, oracle rules, catalog, and runner.
// Dependencies: crate::{core, normalize, oracle, catalog, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Search conformance core decides whether a remote full-text search service
//! honors its documented query grammar. It owns the typed result model, the
//! highlight-stripping normalizer, the per-feature oracle rules, the static
//! scenario catalog, and a bounded-concurrency runner. Transport is reached
//! only through the [`SearchTransport`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod core;
pub mod interfaces;
pub mod normalize;
pub mod oracle;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use catalog::CatalogError;
pub use catalog::CatalogOptions;
pub use catalog::Scenario;
pub use catalog::ScenarioCatalog;
pub use catalog::ScenarioSelection;
pub use catalog::reference_catalog;
pub use interfaces::SearchTransport;
pub use interfaces::TransportError;
pub use normalize::HighlightMarkers;
pub use normalize::NormalizedRecord;
pub use normalize::Normalizer;
pub use normalize::RecordField;
pub use oracle::CaseMode;
pub use oracle::Expectation;
pub use oracle::Observation;
pub use oracle::OracleRule;
pub use oracle::PatternError;
pub use oracle::PhraseTerm;
pub use oracle::ProximityPattern;
pub use oracle::RecordMatcher;
pub use oracle::RecordPredicate;
pub use oracle::RuleOutcome;
pub use oracle::Violation;
pub use oracle::WhitespaceGap;
pub use oracle::WildcardPattern;
pub use runtime::RetryPolicy;
pub use runtime::RunnerConfig;
pub use runtime::RunnerError;
pub use runtime::SuiteReport;
pub use runtime::SuiteRunner;
pub use runtime::SuiteSummary;
