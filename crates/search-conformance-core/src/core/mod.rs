// crates/search-conformance-core/src/core/mod.rs
// ============================================================================
// Module: Search Conformance Core Types
// Description: Identifiers, queries, result records, and verdicts.
// Purpose: Group the data model shared by the oracle, catalog, and runner.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types are plain data. Records are immutable once decoded; verdicts
//! are produced once per scenario and never mutated after being recorded.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod identifiers;
pub mod query;
pub mod record;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::ScenarioId;
pub use query::FeatureTag;
pub use query::Query;
pub use query::UnknownFeatureTag;
pub use record::ResultPage;
pub use record::ResultRecord;
pub use record::SearchResponse;
pub use record::Snippet;
pub use verdict::FailureKind;
pub use verdict::OffendingRecord;
pub use verdict::Strictness;
pub use verdict::Verdict;
pub use verdict::VerdictOutcome;
