//! `stitch fetch` – download a manifest's segments and write the reassembled stream.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stitch_core::config::StitchConfig;
use stitch_core::scheduler::{self, ProgressStats, RunOptions, RunReport};
use stitch_core::transport::{CurlOptions, CurlTransport};
use stitch_core::url_model;
use stitch_core::StitchError;

#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub url: String,
    pub jobs: Option<usize>,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Final result line(s) of a successful fetch.
#[derive(Debug, Clone, Serialize)]
pub struct FetchSummary {
    pub manifest_url: String,
    pub output: String,
    pub segments: usize,
    pub bytes: usize,
    pub elapsed_secs: f64,
    pub failed_attempts: u64,
    pub throttled_attempts: u64,
    pub sha256: String,
}

impl FetchSummary {
    fn from_report(url: &str, output: &Path, report: &RunReport) -> Self {
        Self {
            manifest_url: url.to_string(),
            output: output.display().to_string(),
            segments: report.artifact.segment_count(),
            bytes: report.artifact.len(),
            elapsed_secs: report.elapsed.as_secs_f64(),
            failed_attempts: report.failed_attempts,
            throttled_attempts: report.throttled_attempts,
            sha256: report.artifact.sha256_hex(),
        }
    }

    fn human_lines(&self) -> Vec<String> {
        vec![
            format!("Download complete: {} segments", self.segments),
            format!(
                "Final size: {:.2} MiB ({} bytes)",
                self.bytes as f64 / 1_048_576.0,
                self.bytes
            ),
            format!("Time taken: {:.2}s", self.elapsed_secs),
            format!("SHA-256: {}", self.sha256),
            format!("Written to {}", self.output),
        ]
    }
}

fn output_path(args: &FetchArgs) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| PathBuf::from(url_model::output_filename(&args.url)))
}

/// Write the reassembled stream on the blocking pool.
async fn write_artifact(path: PathBuf, bytes: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        std::fs::write(&path, &bytes).with_context(|| format!("write {}", path.display()))
    })
    .await
    .context("artifact writer task")?
}

pub async fn run_fetch(cfg: &StitchConfig, args: FetchArgs) -> Result<()> {
    let mut opts = RunOptions::from_config(cfg);
    if let Some(jobs) = args.jobs {
        opts.concurrency = jobs;
    }
    let output = output_path(&args);
    let transport = Arc::new(CurlTransport::new(CurlOptions::from_config(cfg)));

    tracing::info!(
        manifest = %args.url,
        concurrency = opts.concurrency,
        output = %output.display(),
        "fetch started"
    );

    let (progress_tx, printer) = if args.quiet {
        (None, None)
    } else {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<ProgressStats>(16);
        let handle = tokio::spawn(async move {
            let mut printed = false;
            while let Some(stats) = rx.recv().await {
                let mut err = std::io::stderr().lock();
                let _ = write!(err, "\r  {}  ", stats);
                let _ = err.flush();
                printed = true;
            }
            if printed {
                eprintln!();
            }
        });
        (Some(tx), Some(handle))
    };

    let result = scheduler::run_manifest(transport, &args.url, &opts, progress_tx).await;
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let StitchError::IncompleteDownload(ref incomplete) = e {
                for failure in &incomplete.failures {
                    eprintln!("  {}", failure);
                }
            }
            tracing::error!("fetch failed: {}", e);
            return Err(e.into());
        }
    };

    let summary = FetchSummary::from_report(&args.url, &output, &report);
    write_artifact(output, report.artifact.into_bytes()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in summary.human_lines() {
            println!("{}", line);
        }
    }
    Ok(())
}
