//! Ordered reassembly of fetched segments into one artifact.

use std::fmt;
use std::ops::Range;

use crate::checksum;
use crate::downloader::{FetchResult, SegmentExhausted};

/// At least one segment could not be fetched; no artifact is produced.
#[derive(Debug)]
pub struct IncompleteDownloadError {
    /// Indices of the failed segments, ascending.
    pub failed_indices: Vec<usize>,
    /// Per-segment failure details, in the same order.
    pub failures: Vec<SegmentExhausted>,
}

impl fmt::Display for IncompleteDownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} segment(s) failed: {:?}",
            self.failed_indices.len(),
            self.failed_indices
        )
    }
}

impl std::error::Error for IncompleteDownloadError {}

/// Every segment succeeded but the concatenation holds no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyArtifactError {
    pub segment_count: usize,
}

impl fmt::Display for EmptyArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "all {} segment(s) succeeded but the reassembled artifact is empty",
            self.segment_count
        )
    }
}

impl std::error::Error for EmptyArtifactError {}

#[derive(Debug)]
pub enum ReassembleError {
    Incomplete(IncompleteDownloadError),
    Empty(EmptyArtifactError),
}

/// Concatenated payloads in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    bytes: Vec<u8>,
    /// `segment_ends[i]` is the exclusive end offset of segment `i`.
    segment_ends: Vec<usize>,
}

impl Artifact {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_ends.len()
    }

    /// Byte range of segment `index` inside the artifact.
    pub fn segment_range(&self, index: usize) -> Option<Range<usize>> {
        let end = *self.segment_ends.get(index)?;
        let start = if index == 0 { 0 } else { self.segment_ends[index - 1] };
        Some(start..end)
    }

    /// SHA-256 of the artifact as lowercase hex.
    pub fn sha256_hex(&self) -> String {
        checksum::sha256_bytes(&self.bytes)
    }
}

/// Orders `results` by index and concatenates the payloads.
///
/// Fails with `Incomplete` if any result is a failure or any index in
/// `0..expected` is missing; with `Empty` if the total length is zero.
pub fn reassemble(results: Vec<FetchResult>, expected: usize) -> Result<Artifact, ReassembleError> {
    let mut payloads: Vec<Option<Vec<u8>>> = (0..expected).map(|_| None).collect();
    let mut failures: Vec<SegmentExhausted> = Vec::new();

    for result in results {
        match result {
            FetchResult::Succeeded { index, payload } => match payloads.get_mut(index) {
                Some(slot) => *slot = Some(payload),
                None => tracing::warn!(index, expected, "ignoring result outside manifest range"),
            },
            FetchResult::FatalFailed(e) => failures.push(e),
        }
    }

    let mut failed_indices: Vec<usize> = failures.iter().map(|e| e.index).collect();
    for (index, slot) in payloads.iter().enumerate() {
        if slot.is_none() && !failed_indices.contains(&index) {
            failed_indices.push(index);
        }
    }
    if !failed_indices.is_empty() {
        failed_indices.sort_unstable();
        failed_indices.dedup();
        failures.sort_by_key(|e| e.index);
        return Err(ReassembleError::Incomplete(IncompleteDownloadError {
            failed_indices,
            failures,
        }));
    }

    let total: usize = payloads.iter().flatten().map(Vec::len).sum();
    let mut bytes = Vec::with_capacity(total);
    let mut segment_ends = Vec::with_capacity(expected);
    for payload in payloads.into_iter().flatten() {
        bytes.extend_from_slice(&payload);
        segment_ends.push(bytes.len());
    }
    debug_assert_eq!(bytes.len(), total);

    if bytes.is_empty() {
        return Err(ReassembleError::Empty(EmptyArtifactError {
            segment_count: expected,
        }));
    }

    Ok(Artifact {
        bytes,
        segment_ends,
    })
}
