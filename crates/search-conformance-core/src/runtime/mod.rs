// crates/search-conformance-core/src/runtime/mod.rs
// ============================================================================
// Module: Search Conformance Runtime
// Description: Scenario execution, retries, and suite reporting.
// Purpose: Drive scenarios through a transport and collect verdicts.
// Dependencies: tokio, tracing, crate::{catalog, interfaces, oracle}
// ============================================================================

//! ## Overview
//! The runtime owns everything with side effects: concurrency, timeouts,
//! retries, and logging. The oracle it calls stays pure.

pub mod report;
pub mod retry;
pub mod runner;

pub use report::SuiteReport;
pub use report::SuiteSummary;
pub use retry::RetryPolicy;
pub use runner::RunnerConfig;
pub use runner::RunnerError;
pub use runner::SuiteRunner;
