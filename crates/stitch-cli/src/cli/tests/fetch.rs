//! Tests for the fetch subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_fetch_defaults() {
    match parse(&["stitch", "fetch", "https://example.com/v/index.m3u8"]) {
        CliCommand::Fetch {
            url,
            jobs,
            output,
            json,
            quiet,
        } => {
            assert_eq!(url, "https://example.com/v/index.m3u8");
            assert!(jobs.is_none());
            assert!(output.is_none());
            assert!(!json);
            assert!(!quiet);
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_all_flags() {
    match parse(&[
        "stitch",
        "fetch",
        "https://example.com/v/index.m3u8",
        "--jobs",
        "8",
        "-o",
        "/tmp/show.ts",
        "--json",
        "-q",
    ]) {
        CliCommand::Fetch {
            jobs,
            output,
            json,
            quiet,
            ..
        } => {
            assert_eq!(jobs, Some(8));
            assert_eq!(output.as_deref(), Some(std::path::Path::new("/tmp/show.ts")));
            assert!(json);
            assert!(quiet);
        }
        _ => panic!("expected Fetch with flags"),
    }
}

#[test]
fn cli_parse_fetch_rejects_zero_jobs() {
    assert!(Cli::try_parse_from(["stitch", "fetch", "https://e.com/i.m3u8", "-j", "0"]).is_err());
}

#[test]
fn cli_parse_fetch_requires_url() {
    assert!(Cli::try_parse_from(["stitch", "fetch"]).is_err());
}
