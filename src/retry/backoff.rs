//! Attempt budget and the delay between attempts.

use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryDecision, RetryPolicy};
use std::time::{Duration, SystemTime};

/// Default lower bound of the delay between two attempts.
pub const DEFAULT_MIN_RETRY_INTERVAL: Duration = Duration::from_millis(500);
/// Default upper bound of the delay between two attempts.
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Exponential backoff with bounded jitter and a fixed attempt budget.
///
/// `max_attempts` counts every attempt, the first one included, so a budget of
/// 3 allows two retries. Delays grow exponentially from `min` and never exceed
/// `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ExponentialBackoff,
    max_attempts: u32,
}

impl Backoff {
    /// Create a backoff for `max_attempts` attempts with delays in `[min, max]`.
    ///
    /// A `min` larger than `max` is clamped down to `max`.
    pub fn new(max_attempts: u32, min: Duration, max: Duration) -> Self {
        let policy = ExponentialBackoff::builder()
            .retry_bounds(min.min(max), max)
            .jitter(Jitter::Bounded)
            .build_with_max_retries(max_attempts.saturating_sub(1));
        Self {
            policy,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Maximum number of attempts, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt is allowed after `failed_attempts` failures.
    pub fn can_retry(&self, failed_attempts: u32) -> bool {
        failed_attempts < self.max_attempts
    }

    /// Delay to wait after `failed_attempts` failures, or `None` once the
    /// budget is spent.
    pub fn delay(&self, failed_attempts: u32) -> Option<Duration> {
        if !self.can_retry(failed_attempts) {
            return None;
        }
        let now = SystemTime::now();
        match self
            .policy
            .should_retry(now, failed_attempts.saturating_sub(1))
        {
            RetryDecision::Retry { execute_after } => Some(
                execute_after
                    .duration_since(SystemTime::now())
                    .unwrap_or_default(),
            ),
            RetryDecision::DoNotRetry => None,
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(5, DEFAULT_MIN_RETRY_INTERVAL, DEFAULT_MAX_RETRY_INTERVAL)
    }
}
