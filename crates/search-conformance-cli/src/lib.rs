// crates/search-conformance-cli/src/lib.rs
// ============================================================================
// Module: Search Conformance CLI Library
// Description: Pipeline, rendering, and artifact helpers behind the binary.
// Purpose: Expose the run pipeline for reuse by system tests.
// Dependencies: search-conformance-{config,core,http}, serde_jcs
// ============================================================================

//! ## Overview
//! The `search-conformance` binary is a thin clap front end over this
//! library: [`pipeline`] assembles and runs the suite, [`render`] produces
//! text output, and [`artifacts`] writes report files.

pub mod artifacts;
pub mod pipeline;
pub mod render;

pub use artifacts::ReportPaths;
pub use artifacts::write_report;
pub use pipeline::PipelineError;
pub use pipeline::RunOverrides;
pub use pipeline::build_catalog;
pub use pipeline::run_suite;
pub use pipeline::run_suite_with;
