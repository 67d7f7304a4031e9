//! CLI command handlers, one per file.

mod checksum;
mod fetch;
mod segments;

pub use checksum::run_checksum;
pub use fetch::{run_fetch, FetchArgs};
pub use segments::run_segments;
