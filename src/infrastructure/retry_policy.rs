//! Retry policy for the fetch gateway
//!
//! Every failure is retried the same way; there is no classification of
//! retryable vs. permanent errors. The delay before retry `n` (0-based) is
//! `base_delay_ms + n * step_delay_ms`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the first retry (milliseconds)
    pub base_delay_ms: u64,
    /// Added per additional retry (milliseconds)
    pub step_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            step_delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Policy without any waiting between attempts
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            step_delay_ms: 0,
        }
    }

    /// Backoff after the failed attempt with the given 0-based index
    #[must_use]
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let step = self.step_delay_ms.saturating_mul(u64::from(attempt_index));
        Duration::from_millis(self.base_delay_ms.saturating_add(step))
    }

    /// Whether another attempt follows the failed attempt `attempt_index`
    #[must_use]
    pub const fn has_attempt_after(&self, attempt_index: u32) -> bool {
        attempt_index + 1 < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_backoff_is_one_plus_attempt_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(3));
    }

    #[test]
    fn last_attempt_has_no_successor() {
        let policy = RetryPolicy::default();
        assert!(policy.has_attempt_after(0));
        assert!(policy.has_attempt_after(1));
        assert!(!policy.has_attempt_after(2));
    }

    #[test]
    fn immediate_policy_never_waits() {
        let policy = RetryPolicy::immediate(5);
        assert_eq!(policy.delay_for(4), Duration::ZERO);
        assert_eq!(policy.max_attempts, 5);
    }
}
