//! HTTP transport used for the manifest and segment GETs.
//!
//! `Transport` is the seam between the engine and the network: the engine
//! only ever asks for "the body of this URL with these headers" and gets
//! back bytes or a classifiable `SegmentError`.

mod curl_transport;
mod headers;

use std::collections::HashMap;

use crate::retry::SegmentError;

pub use curl_transport::{CurlOptions, CurlTransport};
pub use headers::{origin_headers, DEFAULT_USER_AGENT};

/// One blocking GET. Implementations must be shareable across fetch threads.
pub trait Transport: Send + Sync {
    /// Fetch the full body of `url`. Non-2xx responses are `SegmentError::Http`.
    fn get(&self, url: &str, headers: &HashMap<String, String>) -> Result<Vec<u8>, SegmentError>;
}
