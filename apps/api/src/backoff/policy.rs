//! Backoff Policy: how many times to try and how long to wait in between.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("base_delay must be greater than zero")]
    ZeroBaseDelay,

    #[error("multiplier must be at least 1")]
    ZeroMultiplier,
}

/// Immutable retry configuration.
///
/// The delay slept after failed attempt `i` (0-indexed) is `base_delay × multiplier^i`.
/// No jitter is applied, so the schedule is fully determined by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    max_attempts: u32,
    base_delay: Duration,
    multiplier: u32,
    retry_client_errors: bool,
}

impl BackoffPolicy {
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        multiplier: u32,
    ) -> Result<Self, PolicyError> {
        if max_attempts == 0 {
            return Err(PolicyError::ZeroAttempts);
        }
        if base_delay.is_zero() {
            return Err(PolicyError::ZeroBaseDelay);
        }
        if multiplier == 0 {
            return Err(PolicyError::ZeroMultiplier);
        }

        Ok(Self {
            max_attempts,
            base_delay,
            multiplier,
            retry_client_errors: true,
        })
    }

    /// A policy that makes exactly one attempt. Used for best-effort lookups
    /// (image search) where a failure falls back to a placeholder instead.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(1),
            multiplier: 1,
            retry_client_errors: false,
        }
    }

    /// When false, 4xx responses other than 408 and 429 fail on the first attempt.
    pub fn with_retry_client_errors(mut self, retry: bool) -> Self {
        self.retry_client_errors = retry;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Delay to sleep after the failed attempt with the given 0-based index.
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.multiplier
            .checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Total time spent sleeping when every attempt fails.
    /// There is no trailing delay after the final attempt.
    pub fn total_delay(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|i| self.delay_for(i))
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(d))
    }

    /// Whether a non-2xx status should be retried under this policy.
    pub fn retries_status(&self, status: u16) -> bool {
        if (400..500).contains(&status) && status != 408 && status != 429 {
            return self.retry_client_errors;
        }
        true
    }
}
