//! Top-level error returned by a manifest run.

use thiserror::Error;

use crate::manifest::ManifestParseError;
use crate::reassembler::{EmptyArtifactError, IncompleteDownloadError, ReassembleError};
use crate::retry::SegmentError;

/// Exactly one of these is returned when a run does not produce an artifact.
#[derive(Debug, Error)]
pub enum StitchError {
    /// The manifest itself could not be retrieved.
    #[error("manifest fetch failed for {url}: {source}")]
    ManifestFetch {
        url: String,
        #[source]
        source: SegmentError,
    },
    /// The manifest was retrieved but listed no segments. Nothing was fetched.
    #[error(transparent)]
    ManifestParse(#[from] ManifestParseError),
    /// One or more segments exhausted their retry budget.
    #[error("download incomplete: {0}")]
    IncompleteDownload(#[from] IncompleteDownloadError),
    /// All segments succeeded but carried no bytes.
    #[error(transparent)]
    EmptyArtifact(#[from] EmptyArtifactError),
}

impl StitchError {
    /// Indices of the segments that failed, if this is an incomplete download.
    pub fn failed_indices(&self) -> &[usize] {
        match self {
            StitchError::IncompleteDownload(e) => &e.failed_indices,
            _ => &[],
        }
    }
}

impl From<ReassembleError> for StitchError {
    fn from(e: ReassembleError) -> Self {
        match e {
            ReassembleError::Incomplete(e) => StitchError::IncompleteDownload(e),
            ReassembleError::Empty(e) => StitchError::EmptyArtifact(e),
        }
    }
}
