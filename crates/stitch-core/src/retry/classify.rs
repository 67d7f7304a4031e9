//! Map a failed segment attempt to the `ErrorKind` used by the progress
//! counters and attempt logs.

use super::error::SegmentError;
use super::policy::ErrorKind;

/// Kind of a non-2xx segment or manifest response.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        // Rate limiting and "come back later" from CDN edges.
        429 | 503 => ErrorKind::Throttled,
        code @ 500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Kind of a transport-level failure reported by libcurl.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    let connection_lost = [
        e.is_couldnt_connect(),
        e.is_couldnt_resolve_host(),
        e.is_couldnt_resolve_proxy(),
        e.is_send_error(),
        e.is_recv_error(),
        e.is_read_error(),
        e.is_got_nothing(),
    ];
    if e.is_operation_timedout() {
        ErrorKind::Timeout
    } else if connection_lost.contains(&true) {
        ErrorKind::Connection
    } else {
        ErrorKind::Other
    }
}

/// Kind of one failed attempt.
pub fn classify(e: &SegmentError) -> ErrorKind {
    match e {
        SegmentError::Http(code) => classify_http_status(*code),
        SegmentError::Curl(ce) => classify_curl_error(ce),
        SegmentError::InvalidUrl(_) | SegmentError::Aborted(_) => ErrorKind::Other,
    }
}
