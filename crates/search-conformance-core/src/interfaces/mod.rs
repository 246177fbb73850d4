// crates/search-conformance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Search Conformance Interfaces
// Description: Backend-agnostic transport contract for the search service.
// Purpose: Decouple the runner and oracle from HTTP specifics.
// Dependencies: async-trait, thiserror, crate::core
// ============================================================================

//! ## Overview
//! The runner reaches the service only through [`SearchTransport`]. Any
//! implementation must be stateless between calls so scenarios can share one
//! handle concurrently.
//!
//! Security posture: responses are untrusted; implementations must bound
//! body sizes and report undecodable success bodies as
//! [`TransportError::Malformed`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::Query;
use crate::core::SearchResponse;

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Errors returned by search transports.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete in time.
    #[error("request timed out after {elapsed_ms} ms")]
    Timeout {
        /// Time spent before giving up.
        elapsed_ms: u64,
    },
    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request failed for a non-transient reason.
    #[error("request failed: {0}")]
    Request(String),
    /// A success response could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The response body exceeded the configured limit.
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Configured byte limit.
        limit: usize,
    },
}

impl TransportError {
    /// Returns true when retrying may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout {
                ..
            } | Self::Connect(_)
        )
    }
}

// ============================================================================
// SECTION: Search Transport
// ============================================================================

/// Sends one query to the search service.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Issues `query` and returns the service response.
    ///
    /// Non-success statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response could be obtained or a
    /// success body could not be decoded.
    async fn search(&self, query: &Query) -> Result<SearchResponse, TransportError>;
}
