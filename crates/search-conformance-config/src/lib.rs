// crates/search-conformance-config/src/lib.rs
// ============================================================================
// Module: Search Conformance Config Library
// Description: Canonical config model, validation, and environment overrides.
// Purpose: Single source of truth for search-conformance.toml semantics.
// Dependencies: search-conformance-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `search-conformance-config` defines the configuration model for the
//! conformance suite: target service, request limits, runner tuning,
//! normalizer markers, and catalog selection. Validation is strict and
//! fail-closed, and the model converts into the core runner and catalog
//! types.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use env::CONFIG_ENV_VAR;
pub use env::EnvOverrides;
pub use env::OverrideEnv;
