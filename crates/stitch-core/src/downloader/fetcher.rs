//! Single-segment GET with fixed-delay retry and progress side effects.

use std::sync::Arc;

use crate::retry::{classify, run_with_retry, RetryPolicy};
use crate::scheduler::ProgressTracker;
use crate::transport::{origin_headers, Transport};

use super::segment::{FetchResult, Segment, SegmentExhausted};

/// Fetches one segment with retries. Shared by all fetch tasks of a run.
pub struct SegmentFetcher<T: ?Sized> {
    transport: Arc<T>,
    policy: RetryPolicy,
    user_agent: String,
    progress: Arc<ProgressTracker>,
}

impl<T: Transport + ?Sized> SegmentFetcher<T> {
    pub fn new(
        transport: Arc<T>,
        policy: RetryPolicy,
        user_agent: impl Into<String>,
        progress: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            transport,
            policy,
            user_agent: user_agent.into(),
            progress,
        }
    }

    /// Blocking: runs up to `policy.max_attempts` GETs, sleeping `policy.delay`
    /// between them. On success records the segment in the progress tracker.
    pub fn fetch(&self, segment: &Segment) -> FetchResult {
        let headers = match origin_headers(&segment.url, &self.user_agent) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(index = segment.index, url = %segment.url, "cannot derive request headers: {}", e);
                return FetchResult::FatalFailed(SegmentExhausted {
                    index: segment.index,
                    attempts: 0,
                    last_error: e,
                });
            }
        };

        let outcome = run_with_retry(&self.policy, |attempt| {
            self.transport.get(&segment.url, &headers).map_err(|e| {
                let kind = classify(&e);
                self.progress.record_failed_attempt(kind);
                tracing::debug!(
                    index = segment.index,
                    attempt,
                    ?kind,
                    "segment attempt failed: {}",
                    e
                );
                e
            })
        });

        match outcome {
            Ok(payload) => {
                self.progress.record_segment(payload.len() as u64);
                tracing::trace!(index = segment.index, bytes = payload.len(), "segment done");
                FetchResult::Succeeded {
                    index: segment.index,
                    payload,
                }
            }
            Err(exhausted) => {
                tracing::warn!(
                    index = segment.index,
                    attempts = exhausted.attempts,
                    "segment failed permanently: {}",
                    exhausted.last_error
                );
                FetchResult::FatalFailed(SegmentExhausted {
                    index: segment.index,
                    attempts: exhausted.attempts,
                    last_error: exhausted.last_error,
                })
            }
        }
    }
}
