// crates/search-conformance-core/src/runtime/retry.rs
// ============================================================================
// Module: Retry Policy
// Description: Bounded linear backoff for transient transport failures.
// Purpose: Decide whether and when a scenario request is retried.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! Timeouts, connection failures, and unexpected 5xx statuses are retried
//! with linear backoff (`attempt * base_delay`). Everything else is final on
//! the first attempt.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use crate::core::SearchResponse;
use crate::interfaces::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of attempts per scenario.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default backoff unit between attempts.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
/// Upper bound on a single backoff delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Retry Policy
// ============================================================================

/// Retry configuration for scenario requests.
///
/// # Invariants
/// - `max_attempts` counts the first attempt; zero is treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Backoff unit multiplied by the attempt number.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub const NONE: Self = Self {
        max_attempts: 1,
        base_delay: Duration::ZERO,
    };

    /// Returns the effective attempt budget.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 { 1 } else { self.max_attempts }
    }

    /// Returns true when another attempt is allowed after `attempt`.
    #[must_use]
    pub const fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.attempts()
    }

    /// Returns the delay before the attempt following `attempt`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt).min(MAX_RETRY_DELAY)
    }

    /// Returns true when a transport error is worth retrying.
    #[must_use]
    pub const fn should_retry_error(&self, err: &TransportError, attempt: u32) -> bool {
        self.allows_retry_after(attempt) && err.is_transient()
    }

    /// Returns true when a response with an unexpected status is retried.
    #[must_use]
    pub fn should_retry_response(
        &self,
        response: &SearchResponse,
        expected: &[u16],
        attempt: u32,
    ) -> bool {
        self.allows_retry_after(attempt)
            && response.is_server_error()
            && !expected.contains(&response.status)
    }
}
