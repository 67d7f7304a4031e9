//! Segment manifests: fetch once, parse into an ordered list of absolute URLs.

mod parse;

use std::collections::HashMap;
use std::fmt;

use crate::retry::SegmentError;
use crate::transport::Transport;

pub use parse::{base_url_of, parse_manifest, COMMENT_MARKER};

/// Ordered segment URLs plus the directory URL relative entries were resolved against.
/// Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    base_url: String,
    segment_urls: Vec<String>,
}

impl Manifest {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn segment_urls(&self) -> &[String] {
        &self.segment_urls
    }

    pub fn len(&self) -> usize {
        self.segment_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segment_urls.is_empty()
    }
}

/// The manifest was retrieved but contained no segment entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestParseError {
    pub url: String,
}

impl fmt::Display for ManifestParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "manifest {} lists no segments", self.url)
    }
}

impl std::error::Error for ManifestParseError {}

/// GET the manifest text. Only `User-Agent` is sent; the manifest request
/// does not carry the per-segment origin headers.
pub fn fetch_manifest_text<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    user_agent: &str,
) -> Result<String, SegmentError> {
    let mut headers = HashMap::with_capacity(1);
    headers.insert("User-Agent".to_string(), user_agent.to_string());
    let body = transport.get(url, &headers)?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}
