//! Retry policy for segment fetches.
//!
//! Every failed attempt is retried after a fixed delay until the attempt
//! budget is spent. Error classification is kept separate so the progress
//! counters and logs can tell throttling apart from plain failures.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::SegmentError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryExhausted};
