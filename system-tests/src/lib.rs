// system-tests/src/lib.rs
// ============================================================================
// Module: Search Conformance System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common utilities for the search conformance system tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the search conformance
//! system-test binaries in `system-tests/tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
