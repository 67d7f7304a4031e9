use std::time::Duration;

use crate::config::{RetryConfig, MAX_RETRY_DELAY_SECS};

/// High-level classification of an error for logging and progress counters.
///
/// The retry decision itself does not depend on the kind: every failed
/// attempt is retried until the budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (e.g. 429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Server-side failure (5xx other than 503).
    Http5xx(u16),
    /// Any other error (4xx, malformed URL, ...).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; the attempt budget is spent.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fixed-delay retry policy: `max_attempts` tries, `delay` apart.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay between two consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Build a policy from the optional `[retry]` config section.
    ///
    /// The delay is clamped to `0..=MAX_RETRY_DELAY_SECS`; NaN maps to zero.
    pub fn from_config(cfg: Option<&RetryConfig>) -> Self {
        match cfg {
            Some(r) => Self {
                max_attempts: r.max_attempts.max(1),
                delay: Duration::from_secs_f64(r.delay_secs.max(0.0).min(MAX_RETRY_DELAY_SECS)),
            },
            None => Self::default(),
        }
    }

    /// Decide what to do after attempt number `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay)
    }
}
