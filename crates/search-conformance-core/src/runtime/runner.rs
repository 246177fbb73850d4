// crates/search-conformance-core/src/runtime/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Bounded-concurrency scenario execution with early abort.
// Purpose: Turn a scenario catalog into an ordered suite report.
// Dependencies: tokio, tracing, crate::{catalog, interfaces, normalize, oracle}
// ============================================================================

//! ## Overview
//! Each scenario runs on its own task; a semaphore bounds how many are in
//! flight. Workers send `(index, verdict)` pairs over a channel to a single
//! collector, which stores verdicts by registry index so the report order
//! never depends on completion order.
//!
//! The collector counts consecutive transport failures in completion order.
//! Reaching the configured threshold flips a cancellation signal: workers
//! that have not started, and in-flight requests, finish as cancelled.
//! Recorded verdicts are never modified.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::catalog::Scenario;
use crate::catalog::ScenarioCatalog;
use crate::core::FailureKind;
use crate::core::SearchResponse;
use crate::core::Verdict;
use crate::interfaces::SearchTransport;
use crate::interfaces::TransportError;
use crate::normalize::HighlightMarkers;
use crate::normalize::Normalizer;
use crate::oracle::Observation;
use crate::oracle::RuleOutcome;
use crate::runtime::report::SuiteReport;
use crate::runtime::retry::RetryPolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of scenarios in flight.
pub const DEFAULT_CONCURRENCY: usize = 4;
/// Default per-attempt timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default consecutive transport failures before aborting.
pub const DEFAULT_ABORT_AFTER_TRANSPORT_FAILURES: u32 = 3;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Runner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Maximum scenarios in flight.
    pub concurrency: usize,
    /// Timeout wrapped around each transport call.
    pub request_timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// Consecutive transport failures that abort the suite; zero disables.
    pub abort_after_transport_failures: u32,
    /// Highlight markers stripped before evaluation.
    pub markers: HighlightMarkers,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            abort_after_transport_failures: DEFAULT_ABORT_AFTER_TRANSPORT_FAILURES,
            markers: HighlightMarkers::default(),
        }
    }
}

/// Runner construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// The configuration cannot drive a run.
    #[error("invalid runner config: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// SECTION: Suite Runner
// ============================================================================

/// Executes scenarios against a shared transport.
///
/// # Invariants
/// - Exactly one verdict is produced per scenario.
/// - The transport is shared read-only across workers.
pub struct SuiteRunner<T: ?Sized> {
    /// Shared per-scenario executor.
    executor: Arc<ScenarioExecutor<T>>,
    /// Maximum scenarios in flight.
    concurrency: usize,
    /// Consecutive transport failures that abort the suite.
    abort_threshold: u32,
}

impl<T> SuiteRunner<T>
where
    T: SearchTransport + ?Sized + 'static,
{
    /// Creates a runner.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidConfig`] for zero concurrency or a zero
    /// request timeout.
    pub fn new(transport: Arc<T>, config: RunnerConfig) -> Result<Self, RunnerError> {
        if config.concurrency == 0 {
            return Err(RunnerError::InvalidConfig("concurrency must be at least 1".to_string()));
        }
        if config.request_timeout.is_zero() {
            return Err(RunnerError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            executor: Arc::new(ScenarioExecutor {
                transport,
                normalizer: Normalizer::new(config.markers),
                retry: config.retry,
                request_timeout: config.request_timeout,
            }),
            concurrency: config.concurrency,
            abort_threshold: config.abort_after_transport_failures,
        })
    }

    /// Runs a single scenario to completion.
    pub async fn run_scenario(&self, scenario: &Scenario) -> Verdict {
        self.executor.execute(scenario).await
    }

    /// Runs every scenario of `catalog` and returns the ordered report.
    pub async fn run(&self, catalog: &ScenarioCatalog) -> SuiteReport {
        let started_at_ms = unix_millis();
        let started = Instant::now();
        let total = catalog.len();
        info!(scenarios = total, concurrency = self.concurrency, "suite started");

        let (verdict_tx, mut verdict_rx) = mpsc::channel::<(usize, Verdict)>(total.max(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut workers = JoinSet::new();

        for (index, scenario) in catalog.iter().enumerate() {
            let executor = Arc::clone(&self.executor);
            let permits = Arc::clone(&permits);
            let verdict_tx = verdict_tx.clone();
            let cancel_rx = cancel_rx.clone();
            let scenario = scenario.clone();
            workers.spawn(async move {
                let verdict = run_worker(&executor, &scenario, &permits, cancel_rx).await;
                if let Err(mpsc::error::SendError((_, verdict))) =
                    verdict_tx.send((index, verdict)).await
                {
                    debug!(scenario = %verdict.scenario_id, "verdict collector closed");
                }
            });
        }
        drop(verdict_tx);

        let mut slots: Vec<Option<Verdict>> = vec![None; total];
        let mut consecutive_transport_failures = 0_u32;
        while let Some((index, verdict)) = verdict_rx.recv().await {
            debug!(
                scenario = %verdict.scenario_id,
                status = verdict.status_label(),
                attempts = verdict.attempts,
                elapsed_ms = verdict.elapsed_ms,
                "scenario finished"
            );
            if verdict.is_transport_failure() {
                consecutive_transport_failures = consecutive_transport_failures.saturating_add(1);
                if self.abort_threshold > 0
                    && consecutive_transport_failures >= self.abort_threshold
                    && !*cancel_tx.borrow()
                {
                    warn!(
                        failures = consecutive_transport_failures,
                        "aborting suite after consecutive transport failures"
                    );
                    cancel_tx.send_replace(true);
                }
            } else if verdict.failure_kind().is_some() || verdict.is_pass() {
                consecutive_transport_failures = 0;
            }
            if let Some(slot) = slots.get_mut(index)
                && slot.is_none()
            {
                *slot = Some(verdict);
            }
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "scenario worker terminated abnormally");
            }
        }

        let verdicts = slots
            .into_iter()
            .zip(catalog.iter())
            .map(|(slot, scenario)| {
                slot.unwrap_or_else(|| {
                    Verdict::cancelled(
                        scenario.id().clone(),
                        scenario.query().feature(),
                        scenario.strictness(),
                        "scenario worker terminated before reporting",
                    )
                })
            })
            .collect();
        let report = SuiteReport::new(verdicts, started_at_ms, duration_millis(started.elapsed()));
        info!(
            total = report.summary.total,
            passed = report.summary.passed,
            failed = report.summary.failed,
            soft_failed = report.summary.soft_failed,
            cancelled = report.summary.cancelled,
            suite_passed = report.passed,
            "suite finished"
        );
        report
    }
}

/// Acquires a permit and executes one scenario unless the suite is aborted.
async fn run_worker<T>(
    executor: &ScenarioExecutor<T>,
    scenario: &Scenario,
    permits: &Semaphore,
    cancel_rx: watch::Receiver<bool>,
) -> Verdict
where
    T: SearchTransport + ?Sized,
{
    let Ok(_permit) = permits.acquire().await else {
        return cancelled_verdict(scenario, "worker pool closed");
    };
    let aborted = *cancel_rx.borrow();
    if aborted {
        return cancelled_verdict(scenario, "suite aborted before scenario started");
    }
    tokio::select! {
        verdict = executor.execute(scenario) => verdict,
        () = wait_for_cancel(cancel_rx) => {
            cancelled_verdict(scenario, "suite aborted while request was in flight")
        }
    }
}

/// Resolves once cancellation is signalled; never resolves if the signal is dropped.
async fn wait_for_cancel(mut cancel_rx: watch::Receiver<bool>) {
    let closed = cancel_rx.wait_for(|cancelled| *cancelled).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

/// Builds a cancelled verdict for a scenario.
fn cancelled_verdict(scenario: &Scenario, reason: &str) -> Verdict {
    Verdict::cancelled(
        scenario.id().clone(),
        scenario.query().feature(),
        scenario.strictness(),
        reason,
    )
}

// ============================================================================
// SECTION: Scenario Executor
// ============================================================================

/// Per-scenario execution state shared by all workers.
struct ScenarioExecutor<T: ?Sized> {
    /// Shared stateless transport.
    transport: Arc<T>,
    /// Record normalizer.
    normalizer: Normalizer,
    /// Retry policy.
    retry: RetryPolicy,
    /// Timeout per transport call.
    request_timeout: Duration,
}

impl<T> ScenarioExecutor<T>
where
    T: SearchTransport + ?Sized,
{
    /// Sends the scenario query with retries and judges the final response.
    async fn execute(&self, scenario: &Scenario) -> Verdict {
        let started = Instant::now();
        let mut attempt = 0_u32;
        loop {
            attempt += 1;
            let result =
                match tokio::time::timeout(self.request_timeout, self.transport.search(scenario.query()))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout {
                        elapsed_ms: duration_millis(self.request_timeout),
                    }),
                };
            match result {
                Ok(response) => {
                    if self.retry.should_retry_response(&response, scenario.expected_status(), attempt)
                    {
                        warn!(
                            scenario = %scenario.id(),
                            attempt,
                            status = response.status,
                            "retrying after server error"
                        );
                        tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                        continue;
                    }
                    return self
                        .judge(scenario, &response, attempt)
                        .with_timing(attempt, duration_millis(started.elapsed()));
                }
                Err(err) => {
                    if self.retry.should_retry_error(&err, attempt) {
                        warn!(
                            scenario = %scenario.id(),
                            attempt,
                            error = %err,
                            "retrying after transport error"
                        );
                        tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                        continue;
                    }
                    let kind = match err {
                        TransportError::Malformed(_) => FailureKind::MalformedResponse,
                        TransportError::Timeout {
                            ..
                        }
                        | TransportError::Connect(_)
                        | TransportError::Request(_)
                        | TransportError::BodyTooLarge {
                            ..
                        } => FailureKind::Transport,
                    };
                    warn!(scenario = %scenario.id(), attempt, error = %err, "scenario request failed");
                    return scenario_failure(scenario, kind, err.to_string())
                        .with_timing(attempt, duration_millis(started.elapsed()));
                }
            }
        }
    }

    /// Applies status checks and oracle rules to a final response.
    fn judge(&self, scenario: &Scenario, response: &SearchResponse, attempts: u32) -> Verdict {
        let expected = scenario.expected_status();
        if !expected.contains(&response.status) {
            let kind = if response.is_server_error() {
                FailureKind::Transport
            } else {
                FailureKind::UnexpectedStatus
            };
            return scenario_failure(
                scenario,
                kind,
                format!(
                    "status {} after {attempts} attempt(s), expected one of [{}]",
                    response.status,
                    join_statuses(expected)
                ),
            );
        }

        let records = response
            .page
            .as_ref()
            .map(|page| self.normalizer.normalize_all(&page.records))
            .unwrap_or_default();
        let observation = Observation {
            status: response.status,
            body: &response.body,
            found: response.page.as_ref().map(|page| page.found),
            records: &records,
        };

        for rule in scenario.rules() {
            if rule.requires_page() && response.page.is_none() {
                return scenario_failure(
                    scenario,
                    FailureKind::MalformedResponse,
                    format!("rule {} requires a result page but none was decoded", rule.name()),
                );
            }
            if let RuleOutcome::Fail(violation) = rule.evaluate(&observation) {
                debug!(
                    scenario = %scenario.id(),
                    rule = violation.rule,
                    offenders = violation.offending.len(),
                    "oracle rule violated"
                );
                return scenario_failure(
                    scenario,
                    FailureKind::Assertion,
                    format!("{}: {}", violation.rule, violation.diagnostic),
                )
                .with_offending(violation.offending);
            }
        }

        Verdict::pass(
            scenario.id().clone(),
            scenario.query().feature(),
            scenario.strictness(),
            attempts,
            0,
        )
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a failed verdict for a scenario.
fn scenario_failure(scenario: &Scenario, kind: FailureKind, diagnostic: String) -> Verdict {
    Verdict::fail(
        scenario.id().clone(),
        scenario.query().feature(),
        scenario.strictness(),
        kind,
        diagnostic,
    )
}

/// Renders a status list.
fn join_statuses(statuses: &[u16]) -> String {
    statuses.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Converts a duration to whole milliseconds, saturating.
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Returns the current wall-clock time in Unix milliseconds.
fn unix_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(duration_millis).unwrap_or(0)
}
