//! Per-attempt fetch error type.

use std::fmt;

/// Error returned by a single fetch attempt (curl failure or HTTP error).
/// Kept separate from anyhow so the retry loop can classify it.
#[derive(Debug, Clone)]
pub enum SegmentError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// The URL could not be parsed, so no request headers could be derived.
    InvalidUrl(String),
    /// The fetch task ended without producing a result (panic or lost task).
    Aborted(String),
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::Curl(e) => write!(f, "{}", e),
            SegmentError::Http(code) => write!(f, "HTTP {}", code),
            SegmentError::InvalidUrl(url) => write!(f, "invalid URL: {}", url),
            SegmentError::Aborted(reason) => write!(f, "fetch aborted: {}", reason),
        }
    }
}

impl std::error::Error for SegmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SegmentError::Curl(e) => Some(e),
            SegmentError::Http(_) | SegmentError::InvalidUrl(_) | SegmentError::Aborted(_) => None,
        }
    }
}
