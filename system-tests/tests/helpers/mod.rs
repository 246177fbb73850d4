// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for search conformance system-tests.
// Purpose: Provide the stub service, fixtures, and artifact utilities.
// Dependencies: system-tests, search-conformance-{cli,config,core}
// ============================================================================

//! ## Overview
//! Shared helpers for search conformance system-tests.
//! Invariants:
//! - Suites reach only loopback stubs unless a live endpoint is configured.
//! - Every suite writes a summary, even when it panics.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod cli;
pub mod fixtures;
pub mod harness;
pub mod search_stub;
