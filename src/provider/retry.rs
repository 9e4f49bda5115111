// src/provider/retry.rs — Exponential backoff and per-attempt classification
//
// Within one provider every failure is retryable until that provider's
// attempt budget is spent. The loop in the orchestrator branches on
// `AttemptOutcome` rather than on error types.

use std::time::Duration;

use crate::infra::errors::ProviderError;

/// Default base delay between attempts on the same provider.
const BASE_DELAY_MS: u64 = 1_000;
/// Upper bound on any single backoff sleep.
const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(BASE_DELAY_MS),
            max_delay: Duration::from_millis(MAX_DELAY_MS),
        }
    }
}

impl BackoffPolicy {
    pub fn new(base_delay: Duration) -> Self {
        Self {
            base_delay,
            ..Self::default()
        }
    }

    /// A policy that never sleeps. Used by tests and one-shot CLI runs.
    pub fn none() -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay after failed attempt `attempt` (counted from 1): `2^attempt * base`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Total sleep incurred by a provider that fails all `max_retries` attempts.
    pub fn total_delay(&self, max_retries: u32) -> Duration {
        (1..max_retries).map(|a| self.delay_for_attempt(a)).sum()
    }
}

/// Result of one attempt against one provider.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(String),
    /// Failed, but this provider has attempts left.
    Retryable(ProviderError),
    /// Failed on the last permitted attempt for this provider.
    Exhausted(ProviderError),
}

impl AttemptOutcome {
    pub fn classify(result: Result<String, ProviderError>, attempt: u32, max_retries: u32) -> Self {
        match result {
            Ok(text) => AttemptOutcome::Success(text),
            Err(e) if attempt >= max_retries => AttemptOutcome::Exhausted(e),
            Err(e) => AttemptOutcome::Retryable(e),
        }
    }
}
