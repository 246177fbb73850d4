// crates/search-conformance-core/src/core/record.rs
// ============================================================================
// Module: Search Result Records
// Description: Typed result records and search responses.
// Purpose: Replace stringified result inspection with named fields.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`SearchResponse`] is what the transport hands back for one query: the
//! HTTP status, the raw body, and a decoded [`ResultPage`] when the status is
//! a success status. Records keep highlight markers exactly as received;
//! stripping happens in [`crate::normalize`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Highlighted snippet text attached to a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Requirement excerpt, possibly containing highlight markers.
    pub requirement: Option<String>,
    /// Responsibility excerpt, possibly containing highlight markers.
    pub responsibility: Option<String>,
}

/// One result item returned by the search service.
///
/// # Invariants
/// - Immutable once decoded; owned by the response that produced it.
/// - `additional_text` preserves document order of the remaining text leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Service-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Employer display name when present.
    pub employer_name: Option<String>,
    /// Highlighted snippet.
    #[serde(default)]
    pub snippet: Snippet,
    /// Every other textual leaf of the item.
    #[serde(default)]
    pub additional_text: Vec<String>,
}

impl ResultRecord {
    /// Creates a record with an identifier and display name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            employer_name: None,
            snippet: Snippet::default(),
            additional_text: Vec::new(),
        }
    }

    /// Sets the employer name.
    #[must_use]
    pub fn with_employer(mut self, employer_name: impl Into<String>) -> Self {
        self.employer_name = Some(employer_name.into());
        self
    }

    /// Sets the snippet excerpts.
    #[must_use]
    pub fn with_snippet(
        mut self,
        requirement: Option<String>,
        responsibility: Option<String>,
    ) -> Self {
        self.snippet = Snippet {
            requirement,
            responsibility,
        };
        self
    }

    /// Appends an additional text leaf.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.additional_text.push(text.into());
        self
    }

    /// Iterates every textual field in flattening order.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.employer_name.as_deref())
            .chain(self.snippet.requirement.as_deref())
            .chain(self.snippet.responsibility.as_deref())
            .chain(self.additional_text.iter().map(String::as_str))
    }
}

/// Decoded page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Total number of matches reported by the service.
    pub found: u64,
    /// Records on this page, in service order.
    pub records: Vec<ResultRecord>,
}

/// Response to a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body as text.
    pub body: String,
    /// Decoded page for success statuses.
    pub page: Option<ResultPage>,
}

impl SearchResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true for 5xx statuses.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}
