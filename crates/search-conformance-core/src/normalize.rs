// crates/search-conformance-core/src/normalize.rs
// ============================================================================
// Module: Result Normalizer
// Description: Highlight stripping and text flattening for result records.
// Purpose: Produce comparison-ready views of records for the oracle.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Search services wrap matched terms in highlight markers such as
//! `<highlighttext>`. Comparing text before those markers are removed causes
//! false negatives, so every oracle comparison runs against a
//! [`NormalizedRecord`]. Structured fields keep their original case for
//! field-scoped checks; the flattened blob is lowercased.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::ResultRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Highlight markers emitted by the reference service.
pub const DEFAULT_HIGHLIGHT_MARKERS: [&str; 2] = ["<highlighttext>", "</highlighttext>"];

// ============================================================================
// SECTION: Highlight Markers
// ============================================================================

/// Set of highlight marker strings removed before comparison.
///
/// # Invariants
/// - Markers are stored ASCII-lowercased and are never empty.
/// - Matching is ASCII-case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarkers {
    /// Lowercased, non-empty markers.
    markers: Vec<String>,
}

impl Default for HighlightMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_MARKERS)
    }
}

impl HighlightMarkers {
    /// Creates a marker set, dropping empty entries.
    #[must_use]
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut markers: Vec<String> = markers
            .into_iter()
            .map(|marker| marker.as_ref().to_ascii_lowercase())
            .filter(|marker| !marker.is_empty())
            .collect();
        markers.sort();
        markers.dedup();
        Self {
            markers,
        }
    }

    /// Returns the configured markers.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.markers
    }

    /// Removes every marker occurrence from `text`.
    ///
    /// Removal repeats until no marker remains, so markers split around an
    /// inner marker are also removed.
    #[must_use]
    pub fn strip(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let mut changed = false;
            for marker in &self.markers {
                if let Some(next) = remove_ascii_case_insensitive(&current, marker) {
                    current = next;
                    changed = true;
                }
            }
            if !changed {
                return current;
            }
        }
    }
}

/// Removes all occurrences of a lowercased needle, ignoring ASCII case.
///
/// Returns `None` when the needle does not occur.
fn remove_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<String> {
    // ASCII folding preserves byte offsets, so positions found in `folded`
    // are valid char boundaries in `haystack`.
    let folded = haystack.to_ascii_lowercase();
    if !folded.contains(needle) {
        return None;
    }
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(offset) = folded[cursor ..].find(needle) {
        let start = cursor + offset;
        out.push_str(&haystack[cursor .. start]);
        cursor = start + needle.len();
    }
    out.push_str(&haystack[cursor ..]);
    Some(out)
}

// ============================================================================
// SECTION: Normalized Records
// ============================================================================

/// Structured record field addressable by field-scoped rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    /// Display name (`NAME:` in the query grammar).
    Name,
    /// Employer name (`COMPANY_NAME:` in the query grammar).
    EmployerName,
}

impl RecordField {
    /// Returns the canonical snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::EmployerName => "employer_name",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison-ready view of a [`ResultRecord`].
///
/// # Invariants
/// - No configured highlight marker occurs in any field.
/// - `text` is lowercased; `name` and `employer_name` keep original case.
/// - Missing optional fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    /// Record identifier.
    id: String,
    /// Marker-stripped display name.
    name: String,
    /// Marker-stripped employer name.
    employer_name: String,
    /// Flattened, marker-stripped, lowercased text of every field.
    text: String,
}

impl NormalizedRecord {
    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the marker-stripped display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the marker-stripped employer name.
    #[must_use]
    pub fn employer_name(&self) -> &str {
        &self.employer_name
    }

    /// Returns the flattened lowercase text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns a structured field by name.
    #[must_use]
    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::Name => &self.name,
            RecordField::EmployerName => &self.employer_name,
        }
    }
}

// ============================================================================
// SECTION: Normalizer
// ============================================================================

/// Converts result records into [`NormalizedRecord`] views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalizer {
    /// Markers removed from every field.
    markers: HighlightMarkers,
}

impl Normalizer {
    /// Creates a normalizer for the given markers.
    #[must_use]
    pub const fn new(markers: HighlightMarkers) -> Self {
        Self {
            markers,
        }
    }

    /// Returns the configured markers.
    #[must_use]
    pub const fn markers(&self) -> &HighlightMarkers {
        &self.markers
    }

    /// Normalizes one record. Never fails.
    #[must_use]
    pub fn normalize(&self, record: &ResultRecord) -> NormalizedRecord {
        let joined = record.text_fields().collect::<Vec<&str>>().join(" ");
        NormalizedRecord {
            id: record.id.clone(),
            name: self.markers.strip(&record.name),
            employer_name: record
                .employer_name
                .as_deref()
                .map(|employer| self.markers.strip(employer))
                .unwrap_or_default(),
            text: self.markers.strip(&joined.to_lowercase()),
        }
    }

    /// Normalizes every record of a page, preserving order.
    #[must_use]
    pub fn normalize_all(&self, records: &[ResultRecord]) -> Vec<NormalizedRecord> {
        records.iter().map(|record| self.normalize(record)).collect()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
