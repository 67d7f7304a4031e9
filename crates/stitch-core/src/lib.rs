//! stitch-core: fetch a segmented stream from its manifest and reassemble it.
//!
//! Pipeline: `manifest` (fetch + parse) → `scheduler` (bounded parallel
//! fetch via `downloader`, progress reporting) → `reassembler`.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod downloader;
pub mod error;
pub mod manifest;
pub mod reassembler;
pub mod retry;
pub mod scheduler;
pub mod transport;
pub mod url_model;

pub use error::StitchError;
