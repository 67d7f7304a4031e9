//! Segment downloader: the per-segment fetch with retry.
//!
//! `SegmentFetcher` turns one `Segment` into one terminal `FetchResult`.
//! Admission control and aggregation live in `scheduler`.

mod fetcher;
mod segment;

pub use fetcher::SegmentFetcher;
pub use segment::{segments_from_urls, FetchResult, Segment, SegmentExhausted, SegmentState};
