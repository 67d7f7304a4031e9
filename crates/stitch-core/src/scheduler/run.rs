//! One complete run: manifest -> bounded fetch -> ordered reassembly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::config::StitchConfig;
use crate::downloader::{segments_from_urls, SegmentFetcher};
use crate::error::StitchError;
use crate::manifest::{self, Manifest};
use crate::reassembler::{self, Artifact};
use crate::retry::{run_with_retry, RetryPolicy, SegmentError};
use crate::transport::{Transport, DEFAULT_USER_AGENT};

use super::coordinator::Coordinator;
use super::progress::{ProgressStats, ProgressTracker};
use super::reporter::ProgressReporter;

/// Knobs for one run, usually derived from `StitchConfig`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Maximum number of segment fetches in flight.
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub progress_interval: Duration,
    pub user_agent: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&StitchConfig::default())
    }
}

impl RunOptions {
    pub fn from_config(cfg: &StitchConfig) -> Self {
        Self {
            concurrency: cfg.concurrency.max(1),
            retry: RetryPolicy::from_config(cfg.retry.as_ref()),
            progress_interval: Duration::from_millis(cfg.progress_interval_ms),
            user_agent: cfg
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

/// Successful run: the artifact plus what it took to get it.
#[derive(Debug)]
pub struct RunReport {
    pub manifest: Manifest,
    pub artifact: Artifact,
    pub elapsed: Duration,
    pub failed_attempts: u64,
    pub throttled_attempts: u64,
}

/// Fetch `manifest_url`, parse it, download every segment and reassemble.
///
/// Progress stats are forwarded to `stats_tx` every `progress_interval`.
pub async fn run_manifest<T>(
    transport: Arc<T>,
    manifest_url: &str,
    opts: &RunOptions,
    stats_tx: Option<mpsc::Sender<ProgressStats>>,
) -> Result<RunReport, StitchError>
where
    T: Transport + ?Sized + 'static,
{
    let manifest = load_manifest(Arc::clone(&transport), manifest_url, opts).await?;
    run_segments(transport, manifest, opts, stats_tx).await
}

/// Fetch and parse the manifest only. The manifest GET uses the same retry
/// policy as segments.
pub async fn load_manifest<T>(
    transport: Arc<T>,
    manifest_url: &str,
    opts: &RunOptions,
) -> Result<Manifest, StitchError>
where
    T: Transport + ?Sized + 'static,
{
    let url = manifest_url.to_string();
    let policy = opts.retry;
    let user_agent = opts.user_agent.clone();
    tracing::info!(manifest = %url, "fetching manifest");

    let fetched = tokio::task::spawn_blocking({
        let url = url.clone();
        move || {
            run_with_retry(&policy, |attempt| {
                manifest::fetch_manifest_text(transport.as_ref(), &url, &user_agent).map_err(|e| {
                    tracing::debug!(attempt, "manifest attempt failed: {}", e);
                    e
                })
            })
        }
    })
    .await;

    let text = match fetched {
        Ok(Ok(text)) => text,
        Ok(Err(exhausted)) => {
            return Err(StitchError::ManifestFetch {
                url,
                source: exhausted.last_error,
            })
        }
        Err(e) => {
            return Err(StitchError::ManifestFetch {
                url,
                source: SegmentError::Aborted(e.to_string()),
            })
        }
    };

    Ok(manifest::parse_manifest(&text, &url)?)
}

/// Download every segment of an already parsed manifest and reassemble.
pub async fn run_segments<T>(
    transport: Arc<T>,
    manifest: Manifest,
    opts: &RunOptions,
    stats_tx: Option<mpsc::Sender<ProgressStats>>,
) -> Result<RunReport, StitchError>
where
    T: Transport + ?Sized + 'static,
{
    let started = Instant::now();
    let segment_count = manifest.len();
    let tracker = Arc::new(ProgressTracker::new());
    let fetcher = Arc::new(SegmentFetcher::new(
        transport,
        opts.retry,
        opts.user_agent.clone(),
        Arc::clone(&tracker),
    ));

    let reporter = ProgressReporter::spawn(
        Arc::clone(&tracker),
        segment_count,
        opts.progress_interval,
        stats_tx,
    );

    let segments = segments_from_urls(manifest.segment_urls());
    let results = Coordinator::new(opts.concurrency).run(fetcher, segments).await;
    reporter.stop().await;

    let failed_attempts = tracker.failed_attempts();
    let throttled_attempts = tracker.throttled_attempts();
    let artifact = reassembler::reassemble(results, segment_count).map_err(StitchError::from)?;
    let elapsed = started.elapsed();

    tracing::info!(
        segments = segment_count,
        bytes = artifact.len(),
        failed_attempts,
        elapsed_secs = elapsed.as_secs_f64(),
        "reassembly complete"
    );

    Ok(RunReport {
        manifest,
        artifact,
        elapsed,
        failed_attempts,
        throttled_attempts,
    })
}
