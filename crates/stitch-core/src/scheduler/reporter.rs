//! Background progress reporter: polls the tracker on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::progress::{ProgressStats, ProgressTracker};

/// Handle to a running reporter task. Dropping the handle also stops the
/// loop (the cancel sender goes away), but `stop` additionally waits for it.
pub struct ProgressReporter {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl ProgressReporter {
    /// Spawn the reporter on the current tokio runtime.
    ///
    /// Every `interval` it snapshots `tracker`, logs the status line and
    /// forwards the stats to `stats_tx` (dropped if the receiver lags). The
    /// loop ends by itself once `segment_count` segments have completed.
    pub fn spawn(
        tracker: Arc<ProgressTracker>,
        segment_count: usize,
        interval: Duration,
        stats_tx: Option<mpsc::Sender<ProgressStats>>,
    ) -> Self {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let handle = tokio::spawn(run_reporter_loop(
            tracker,
            segment_count,
            interval,
            stats_tx,
            cancel_rx,
        ));
        Self {
            cancel: Some(cancel_tx),
            handle,
        }
    }

    /// Signal the loop to stop and wait for it. The loop emits one last status
    /// line and exits; it never waits on fetch work.
    pub async fn stop(mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            tracing::warn!("progress reporter ended abnormally: {}", e);
        }
    }
}

async fn run_reporter_loop(
    tracker: Arc<ProgressTracker>,
    segment_count: usize,
    interval: Duration,
    stats_tx: Option<mpsc::Sender<ProgressStats>>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = &mut cancel_rx => {
                // Final line so the last state is always reported once.
                emit(&tracker, segment_count, stats_tx.as_ref());
                tracing::trace!("progress reporter cancelled");
                break;
            }
            _ = ticker.tick() => {
                if emit(&tracker, segment_count, stats_tx.as_ref()).is_complete() {
                    break;
                }
            }
        }
    }
}

fn emit(
    tracker: &ProgressTracker,
    segment_count: usize,
    stats_tx: Option<&mpsc::Sender<ProgressStats>>,
) -> ProgressStats {
    let stats = tracker.stats(segment_count);
    tracing::debug!("{}", stats);
    if let Some(tx) = stats_tx {
        let _ = tx.try_send(stats.clone());
    }
    stats
}
