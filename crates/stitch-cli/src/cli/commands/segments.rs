//! `stitch segments` – show what a manifest resolves to without downloading.

use anyhow::Result;
use std::sync::Arc;
use stitch_core::config::StitchConfig;
use stitch_core::scheduler::{self, RunOptions};
use stitch_core::transport::{CurlOptions, CurlTransport};

pub async fn run_segments(cfg: &StitchConfig, url: &str) -> Result<()> {
    let transport = Arc::new(CurlTransport::new(CurlOptions::from_config(cfg)));
    let opts = RunOptions::from_config(cfg);
    let manifest = scheduler::load_manifest(transport, url, &opts).await?;

    println!("# base {}", manifest.base_url());
    for (i, segment_url) in manifest.segment_urls().iter().enumerate() {
        println!("{:<6} {}", i, segment_url);
    }
    Ok(())
}
