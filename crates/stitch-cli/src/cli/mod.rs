//! CLI for the stitch segmented stream fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stitch_core::config;

use commands::{run_checksum, run_fetch, run_segments, FetchArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "stitch")]
#[command(about = "stitch: fetch a segmented stream and reassemble it in order", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every segment of a manifest and write the reassembled stream.
    Fetch {
        /// Manifest URL (newline-delimited; `#` lines are ignored).
        url: String,
        /// Maximum segment downloads in flight (default from config, 4).
        #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
        jobs: Option<u16>,
        /// Output file (default: derived from the manifest name, `.ts`).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Print the final summary as JSON on stdout.
        #[arg(long)]
        json: bool,
        /// Do not print the live progress line.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Fetch and parse a manifest, print the resolved segment URLs in order.
    Segments {
        /// Manifest URL.
        url: String,
    },

    /// Compute SHA-256 of a file (e.g. a reassembled stream).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                url,
                jobs,
                output,
                json,
                quiet,
            } => {
                let args = FetchArgs {
                    url,
                    jobs: jobs.map(usize::from),
                    output,
                    json,
                    quiet,
                };
                run_fetch(&cfg, args).await?
            }
            CliCommand::Segments { url } => run_segments(&cfg, &url).await?,
            CliCommand::Checksum { path } => run_checksum(&path).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
