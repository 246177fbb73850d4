// crates/search-conformance-http/src/lib.rs
// ============================================================================
// Module: Search Conformance HTTP Library
// Description: HTTP implementation of the core search transport.
// Purpose: Connect the conformance runner to a live search endpoint.
// Dependencies: search-conformance-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! `search-conformance-http` implements
//! [`search_conformance_core::SearchTransport`] over HTTP and decodes the
//! reference service's JSON wire format.
//!
//! Security posture: responses are untrusted; bodies are size-limited and
//! decoding fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod transport;
pub mod wire;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use transport::DEFAULT_MAX_RESPONSE_BYTES;
pub use transport::DEFAULT_QUERY_PARAM;
pub use transport::DEFAULT_TIMEOUT;
pub use transport::HttpSearchTransport;
pub use transport::HttpTransportConfig;
pub use wire::decode_page;
