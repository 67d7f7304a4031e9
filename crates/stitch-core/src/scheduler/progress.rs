//! Shared progress counters for one run and the snapshots derived from them.
//!
//! Fetch threads only ever increment; the reporter only ever reads. Bytes are
//! added before the completion count (Release) and the snapshot loads the
//! count first (Acquire), so a snapshot never shows a completed segment
//! without its bytes.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

use crate::retry::ErrorKind;

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressCounters {
    pub completed_count: usize,
    pub total_bytes: u64,
}

/// Thread-safe progress counters owned by one run.
#[derive(Debug)]
pub struct ProgressTracker {
    completed: AtomicUsize,
    bytes: AtomicU64,
    failed_attempts: AtomicU64,
    throttled_attempts: AtomicU64,
    started: Instant,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            completed: AtomicUsize::new(0),
            bytes: AtomicU64::new(0),
            failed_attempts: AtomicU64::new(0),
            throttled_attempts: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// One more segment finished with `bytes` of payload.
    pub fn record_segment(&self, bytes: u64) {
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Release);
    }

    /// One fetch attempt failed (it may still be retried).
    pub fn record_failed_attempt(&self, kind: ErrorKind) {
        self.failed_attempts.fetch_add(1, Ordering::Relaxed);
        if kind == ErrorKind::Throttled {
            self.throttled_attempts.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ProgressCounters {
        let completed_count = self.completed.load(Ordering::Acquire);
        let total_bytes = self.bytes.load(Ordering::Relaxed);
        ProgressCounters {
            completed_count,
            total_bytes,
        }
    }

    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts.load(Ordering::Relaxed)
    }

    pub fn throttled_attempts(&self) -> u64 {
        self.throttled_attempts.load(Ordering::Relaxed)
    }

    /// Full stats for a run of `segment_count` segments.
    pub fn stats(&self, segment_count: usize) -> ProgressStats {
        let snap = self.snapshot();
        ProgressStats {
            segments_done: snap.completed_count,
            segment_count,
            bytes_done: snap.total_bytes,
            failed_attempts: self.failed_attempts(),
            elapsed_secs: self.started.elapsed().as_secs_f64(),
        }
    }
}

/// Snapshot of download progress for one run (CLI-friendly).
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Number of segments completed.
    pub segments_done: usize,
    /// Total number of segments in the manifest.
    pub segment_count: usize,
    /// Payload bytes received so far (completed segments only).
    pub bytes_done: u64,
    /// Failed attempts so far, retried or not.
    pub failed_attempts: u64,
    /// Elapsed time since the run started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Fraction of segments complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.segment_count == 0 {
            return 1.0;
        }
        (self.segments_done as f64 / self.segment_count as f64).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.segments_done >= self.segment_count
    }
}

impl fmt::Display for ProgressStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mib = self.bytes_done as f64 / 1_048_576.0;
        let rate_mib = self.bytes_per_sec() / 1_048_576.0;
        write!(
            f,
            "{:.2} MiB/s | segments {}/{} ({:.1}%) | {:.2} MiB",
            rate_mib,
            self.segments_done,
            self.segment_count,
            self.fraction() * 100.0,
            mib
        )?;
        if self.failed_attempts > 0 {
            write!(f, " | {} failed attempt(s)", self.failed_attempts)?;
        }
        Ok(())
    }
}
