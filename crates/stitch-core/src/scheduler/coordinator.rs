//! Admission control: keep at most `limit` segment fetches in flight and
//! collect one terminal result per segment.
//!
//! Same shape as a bounded job queue: fill the `JoinSet` up to the limit,
//! wait for one to finish, refill. A failed segment never cancels its
//! siblings; every slot is filled before returning.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::downloader::{FetchResult, Segment, SegmentExhausted, SegmentFetcher, SegmentState};
use crate::retry::SegmentError;
use crate::transport::Transport;

/// Drives all segment fetches of one run under a concurrency limit.
#[derive(Debug, Clone, Copy)]
pub struct Coordinator {
    limit: usize,
}

impl Coordinator {
    /// `limit` is clamped to at least 1.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetch every segment exactly once (the fetcher handles its own retries)
    /// and return the results in the order `segments` was given, which is
    /// index order for a parsed manifest.
    pub async fn run<T>(&self, fetcher: Arc<SegmentFetcher<T>>, segments: Vec<Segment>) -> Vec<FetchResult>
    where
        T: Transport + ?Sized + 'static,
    {
        let count = segments.len();
        let mut slots: Vec<SegmentState> = (0..count).map(|_| SegmentState::Pending).collect();
        let mut indices: Vec<usize> = Vec::with_capacity(count);
        let mut pending: VecDeque<(usize, Segment)> = VecDeque::with_capacity(count);
        for (slot, segment) in segments.into_iter().enumerate() {
            if segment.index != slot {
                tracing::warn!(slot, index = segment.index, "segment index does not match its position");
            }
            indices.push(segment.index);
            pending.push_back((slot, segment));
        }
        let mut join_set: JoinSet<(usize, FetchResult)> = JoinSet::new();

        tracing::debug!(segments = count, limit = self.limit, "starting segment fetches");

        loop {
            while join_set.len() < self.limit {
                let Some((slot, segment)) = pending.pop_front() else {
                    break;
                };
                slots[slot] = SegmentState::InFlight;
                let fetcher = Arc::clone(&fetcher);
                join_set.spawn_blocking(move || (slot, fetch_catching_panics(&fetcher, &segment)));
            }

            let Some(res) = join_set.join_next().await else {
                break;
            };
            match res {
                Ok((slot, result)) => slots[slot] = SegmentState::Done(result),
                Err(e) => {
                    // Panics are caught inside the task, so this is a cancelled
                    // task; its slot stays InFlight and is failed below.
                    tracing::error!("segment task join: {}", e);
                }
            }
        }

        slots
            .into_iter()
            .zip(indices)
            .map(|(state, index)| match state {
                SegmentState::Done(result) => result,
                SegmentState::Pending | SegmentState::InFlight => {
                    FetchResult::FatalFailed(SegmentExhausted {
                        index,
                        attempts: 0,
                        last_error: SegmentError::Aborted("fetch task did not complete".to_string()),
                    })
                }
            })
            .collect()
    }
}

fn fetch_catching_panics<T>(fetcher: &SegmentFetcher<T>, segment: &Segment) -> FetchResult
where
    T: Transport + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(segment))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            tracing::error!(index = segment.index, "segment fetch panicked: {}", reason);
            FetchResult::FatalFailed(SegmentExhausted {
                index: segment.index,
                attempts: 0,
                last_error: SegmentError::Aborted(reason),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::segments_from_urls;
    use crate::retry::RetryPolicy;
    use crate::scheduler::ProgressTracker;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves `seg{i}` bodies after a short sleep, tracking concurrency.
    struct CountingTransport {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: Mutex<HashMap<String, usize>>,
        fail_url: Option<String>,
        panic_url: Option<String>,
        delay: Duration,
    }

    impl CountingTransport {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                calls: Mutex::new(HashMap::new()),
                fail_url: None,
                panic_url: None,
                delay: Duration::from_millis(20),
            }
        }
    }

    impl Transport for CountingTransport {
        fn get(&self, url: &str, _headers: &HashMap<String, String>) -> Result<Vec<u8>, SegmentError> {
            *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.panic_url.as_deref() == Some(url) {
                panic!("boom");
            }
            if self.fail_url.as_deref() == Some(url) {
                return Err(SegmentError::Http(500));
            }
            Ok(url.as_bytes().to_vec())
        }
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("http://media.test/seg{}.ts", i)).collect()
    }

    fn fetcher(transport: Arc<CountingTransport>) -> Arc<SegmentFetcher<CountingTransport>> {
        let policy = RetryPolicy {
            max_attempts: 5,
            delay: Duration::ZERO,
        };
        Arc::new(SegmentFetcher::new(
            transport,
            policy,
            "ua",
            Arc::new(ProgressTracker::new()),
        ))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_limit_and_starts_each_segment_once() {
        let transport = Arc::new(CountingTransport::new());
        let urls = urls(12);
        let results = Coordinator::new(3)
            .run(fetcher(Arc::clone(&transport)), segments_from_urls(&urls))
            .await;

        assert_eq!(results.len(), 12);
        assert!(results.iter().all(FetchResult::is_success));
        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 3);
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 12);
        assert!(calls.values().all(|&n| n == 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn results_come_back_in_index_order() {
        let transport = Arc::new(CountingTransport::new());
        let urls = urls(5);
        let results = Coordinator::new(5)
            .run(fetcher(transport), segments_from_urls(&urls))
            .await;
        let indices: Vec<usize> = results.iter().map(FetchResult::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn failed_segment_does_not_cancel_siblings() {
        let mut transport = CountingTransport::new();
        transport.delay = Duration::from_millis(2);
        transport.fail_url = Some("http://media.test/seg1.ts".to_string());
        let transport = Arc::new(transport);
        let urls = urls(4);
        let results = Coordinator::new(2)
            .run(fetcher(Arc::clone(&transport)), segments_from_urls(&urls))
            .await;

        let failed: Vec<usize> = results
            .iter()
            .filter(|r| !r.is_success())
            .map(FetchResult::index)
            .collect();
        assert_eq!(failed, vec![1]);
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls["http://media.test/seg1.ts"], 5);
        assert_eq!(calls["http://media.test/seg3.ts"], 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn panicking_fetch_fills_its_slot() {
        let mut transport = CountingTransport::new();
        transport.delay = Duration::from_millis(1);
        transport.panic_url = Some("http://media.test/seg0.ts".to_string());
        let urls = urls(2);
        let results = Coordinator::new(2)
            .run(fetcher(Arc::new(transport)), segments_from_urls(&urls))
            .await;
        match &results[0] {
            FetchResult::FatalFailed(e) => {
                assert_eq!(e.index, 0);
                assert!(matches!(e.last_error, SegmentError::Aborted(_)));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(results[1].is_success());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn sparse_indices_do_not_panic() {
        let segments = vec![
            Segment {
                index: 7,
                url: "http://media.test/seg7.ts".to_string(),
            },
            Segment {
                index: 2,
                url: "http://media.test/seg2.ts".to_string(),
            },
        ];
        let results = Coordinator::new(2)
            .run(fetcher(Arc::new(CountingTransport::new())), segments)
            .await;
        let indices: Vec<usize> = results.iter().map(FetchResult::index).collect();
        assert_eq!(indices, vec![7, 2]);
        assert!(results.iter().all(FetchResult::is_success));
    }

    #[tokio::test]
    async fn empty_segment_list_returns_nothing() {
        let results = Coordinator::new(4)
            .run(fetcher(Arc::new(CountingTransport::new())), Vec::new())
            .await;
        assert!(results.is_empty());
    }

    #[test]
    fn limit_is_at_least_one() {
        assert_eq!(Coordinator::new(0).limit(), 1);
    }
}
