// crates/search-conformance-core/src/core/query.rs
// ============================================================================
// Module: Search Queries
// Description: Raw query strings tagged with the grammar feature they probe.
// Purpose: Carry query intent from the catalog to the transport and oracle.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Query`] is the literal text sent to the search service plus a
//! [`FeatureTag`] naming the grammar feature it exercises. An empty query
//! text means the request is issued without a query parameter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Feature Tags
// ============================================================================

/// Grammar feature exercised by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureTag {
    /// Endpoint reachability without a query.
    Smoke,
    /// Single bare term.
    Term,
    /// Several bare words, order independent.
    MultiTerm,
    /// Quoted phrase with proximity semantics.
    Phrase,
    /// Bare term expanded to related word forms.
    WordForms,
    /// Stemming disabled with a leading `!`.
    ExactForm,
    /// Prefix followed by `*`.
    Wildcard,
    /// Term expanded to declared synonyms.
    Synonym,
    /// Disjunction with `OR`.
    BooleanOr,
    /// Conjunction with `AND`.
    BooleanAnd,
    /// Exclusion with `NOT`.
    BooleanNot,
    /// Parenthesized boolean sub-expressions.
    Grouped,
    /// `FIELD:` scoped matching.
    FieldScoped,
    /// Unknown field names that must match nothing.
    InvalidField,
    /// Nonsense token that must match nothing.
    Nonsense,
    /// Injection payloads.
    SecurityProbe,
    /// Query far beyond the accepted length.
    OversizedInput,
}

impl FeatureTag {
    /// Every feature tag in catalog order.
    pub const ALL: [Self; 17] = [
        Self::Smoke,
        Self::Term,
        Self::MultiTerm,
        Self::Phrase,
        Self::WordForms,
        Self::ExactForm,
        Self::Wildcard,
        Self::Synonym,
        Self::BooleanOr,
        Self::BooleanAnd,
        Self::BooleanNot,
        Self::Grouped,
        Self::FieldScoped,
        Self::InvalidField,
        Self::Nonsense,
        Self::SecurityProbe,
        Self::OversizedInput,
    ];

    /// Returns the canonical snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Term => "term",
            Self::MultiTerm => "multi_term",
            Self::Phrase => "phrase",
            Self::WordForms => "word_forms",
            Self::ExactForm => "exact_form",
            Self::Wildcard => "wildcard",
            Self::Synonym => "synonym",
            Self::BooleanOr => "boolean_or",
            Self::BooleanAnd => "boolean_and",
            Self::BooleanNot => "boolean_not",
            Self::Grouped => "grouped",
            Self::FieldScoped => "field_scoped",
            Self::InvalidField => "invalid_field",
            Self::Nonsense => "nonsense",
            Self::SecurityProbe => "security_probe",
            Self::OversizedInput => "oversized_input",
        }
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a feature tag label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature tag: {0}")]
pub struct UnknownFeatureTag(pub String);

impl FromStr for FeatureTag {
    type Err = UnknownFeatureTag;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let label = value.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownFeatureTag(label.to_string()))
    }
}

// ============================================================================
// SECTION: Query
// ============================================================================

/// Query text plus the grammar feature it exercises.
///
/// # Invariants
/// - `text` is sent verbatim; encoding is owned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Raw query text.
    text: String,
    /// Grammar feature under test.
    feature: FeatureTag,
}

impl Query {
    /// Creates a query for the given feature.
    #[must_use]
    pub fn new(text: impl Into<String>, feature: FeatureTag) -> Self {
        Self {
            text: text.into(),
            feature,
        }
    }

    /// Returns the raw query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the grammar feature under test.
    #[must_use]
    pub const fn feature(&self) -> FeatureTag {
        self.feature
    }

    /// Returns true when the request carries no query parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns a display-safe preview truncated to `max_chars` characters.
    ///
    /// Control characters are replaced so oversized random payloads stay on
    /// one line in reports.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let total = self.text.chars().count();
        let mut preview: String = self
            .text
            .chars()
            .take(max_chars)
            .map(|ch| if ch.is_control() { ' ' } else { ch })
            .collect();
        if total > max_chars {
            preview.push_str(&format!("... ({total} chars)"));
        }
        preview
    }
}
