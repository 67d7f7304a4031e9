//! Segment model: manifest position, URL, lifecycle state and fetch outcome.

use thiserror::Error;

use crate::retry::SegmentError;

/// One fetchable chunk, identified by its position in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub url: String,
}

/// Build the segment list 1:1 from manifest URLs.
pub fn segments_from_urls(urls: &[String]) -> Vec<Segment> {
    urls.iter()
        .enumerate()
        .map(|(index, url)| Segment {
            index,
            url: url.clone(),
        })
        .collect()
}

/// A segment's retry budget ran out. Terminal; never retried by the coordinator.
#[derive(Debug, Clone, Error)]
#[error("segment {index} failed after {attempts} attempt(s): {last_error}")]
pub struct SegmentExhausted {
    pub index: usize,
    pub attempts: u32,
    #[source]
    pub last_error: SegmentError,
}

/// Terminal outcome of fetching one segment.
#[derive(Debug)]
pub enum FetchResult {
    Succeeded { index: usize, payload: Vec<u8> },
    FatalFailed(SegmentExhausted),
}

impl FetchResult {
    pub fn index(&self) -> usize {
        match self {
            FetchResult::Succeeded { index, .. } => *index,
            FetchResult::FatalFailed(e) => e.index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Succeeded { .. })
    }
}

/// Lifecycle of a segment inside one run. Moves forward only:
/// `Pending -> InFlight -> Done`.
#[derive(Debug, Default)]
pub enum SegmentState {
    #[default]
    Pending,
    InFlight,
    Done(FetchResult),
}
