// crates/search-conformance-core/src/oracle/matcher.rs
// ============================================================================
// Module: Record Matchers
// Description: Leaf predicates evaluated against normalized records.
// Purpose: Provide the atoms of boolean expectation trees.
// Dependencies: crate::normalize, crate::oracle::pattern
// ============================================================================

//! ## Overview
//! [`RecordMatcher`] is the leaf type of an [`crate::oracle::Expectation`]
//! tree. Text matchers run against the lowercased flattened text; field
//! matchers run against one structured field with an explicit [`CaseMode`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::normalize::NormalizedRecord;
use crate::normalize::RecordField;
use crate::oracle::pattern::ProximityPattern;
use crate::oracle::pattern::WildcardPattern;

// ============================================================================
// SECTION: Predicate Trait
// ============================================================================

/// Predicate over a single normalized record.
pub trait RecordPredicate {
    /// Returns true when the predicate holds for `record`.
    fn holds(&self, record: &NormalizedRecord) -> bool;

    /// Returns a short human-readable description.
    fn describe(&self) -> String;
}

// ============================================================================
// SECTION: Matchers
// ============================================================================

/// Case handling for field-scoped matchers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseMode {
    /// Compare after lowercasing both sides.
    #[default]
    Insensitive,
    /// Compare code points exactly.
    Exact,
}

/// Leaf matcher over a normalized record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordMatcher {
    /// Flattened text contains the lowercased term.
    Contains(String),
    /// Flattened text contains the proximity phrase.
    Phrase(ProximityPattern),
    /// Flattened text contains a word with the prefix.
    Prefix(WildcardPattern),
    /// A structured field contains the needle.
    Field {
        /// Field under test.
        field: RecordField,
        /// Substring to look for.
        needle: String,
        /// Case handling.
        case: CaseMode,
    },
}

impl RecordMatcher {
    /// Creates a substring matcher; the term is lowercased.
    #[must_use]
    pub fn contains(term: &str) -> Self {
        Self::Contains(term.to_lowercase())
    }

    /// Creates a field matcher.
    #[must_use]
    pub fn field(field: RecordField, needle: impl Into<String>, case: CaseMode) -> Self {
        Self::Field {
            field,
            needle: needle.into(),
            case,
        }
    }
}

impl RecordPredicate for RecordMatcher {
    fn holds(&self, record: &NormalizedRecord) -> bool {
        match self {
            Self::Contains(term) => record.text().contains(term.as_str()),
            Self::Phrase(pattern) => pattern.is_match(record.text()),
            Self::Prefix(pattern) => pattern.is_match(record.text()),
            Self::Field {
                field,
                needle,
                case,
            } => {
                let value = record.field(*field);
                match case {
                    CaseMode::Exact => value.contains(needle.as_str()),
                    CaseMode::Insensitive => {
                        value.to_lowercase().contains(&needle.to_lowercase())
                    }
                }
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Contains(term) => format!("contains \"{term}\""),
            Self::Phrase(pattern) => format!("matches /{pattern}/"),
            Self::Prefix(pattern) => format!("has word {pattern}"),
            Self::Field {
                field,
                needle,
                case: CaseMode::Exact,
            } => format!("{field} contains \"{needle}\" (exact case)"),
            Self::Field {
                field,
                needle,
                case: CaseMode::Insensitive,
            } => format!("{field} contains \"{needle}\""),
        }
    }
}
