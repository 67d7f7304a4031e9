//! Retry loop: run a closure until success or the attempt budget is spent.

use super::error::SegmentError;
use super::policy::{RetryDecision, RetryPolicy};

/// The attempt budget ran out; carries the number of attempts and the last error.
#[derive(Debug, Clone)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: SegmentError,
}

/// Runs `f` until it succeeds or the policy says to stop. `f` receives the
/// 1-based attempt number. Between attempts the current thread sleeps for the
/// policy delay, so call this from a blocking context.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, RetryExhausted>
where
    F: FnMut(u32) -> Result<T, SegmentError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: e,
                    })
                }
                RetryDecision::RetryAfter(d) => {
                    if !d.is_zero() {
                        std::thread::sleep(d);
                    }
                    attempt += 1;
                }
            },
        }
    }
}
