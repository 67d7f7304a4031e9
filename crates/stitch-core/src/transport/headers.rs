//! Per-segment request headers derived from the segment's own origin.

use std::collections::HashMap;

use crate::retry::SegmentError;

/// Browser-like client string sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Builds `User-Agent`, `Origin` and `Referer` for `url`.
///
/// `Origin` is `scheme://host[:port]`, `Referer` is the same with a trailing
/// slash. Computed per URL: segments may live on a different host than the
/// manifest.
pub fn origin_headers(url: &str, user_agent: &str) -> Result<HashMap<String, String>, SegmentError> {
    let parsed = url::Url::parse(url).map_err(|_| SegmentError::InvalidUrl(url.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(SegmentError::InvalidUrl(url.to_string()));
    }
    let origin = parsed.origin().ascii_serialization();

    let mut headers = HashMap::with_capacity(3);
    headers.insert("User-Agent".to_string(), user_agent.to_string());
    headers.insert("Referer".to_string(), format!("{}/", origin));
    headers.insert("Origin".to_string(), origin);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_and_referer_from_segment_url() {
        let h = origin_headers("https://cdn.example.com/hls/720p/seg-001.ts?t=1", "ua").unwrap();
        assert_eq!(h["Origin"], "https://cdn.example.com");
        assert_eq!(h["Referer"], "https://cdn.example.com/");
        assert_eq!(h["User-Agent"], "ua");
    }

    #[test]
    fn explicit_port_is_kept() {
        let h = origin_headers("http://127.0.0.1:8080/a/b.ts", "ua").unwrap();
        assert_eq!(h["Origin"], "http://127.0.0.1:8080");
        assert_eq!(h["Referer"], "http://127.0.0.1:8080/");
    }

    #[test]
    fn different_hosts_get_different_headers() {
        let a = origin_headers("https://a.example.com/x.ts", "ua").unwrap();
        let b = origin_headers("https://b.example.net/y.ts", "ua").unwrap();
        assert_ne!(a["Origin"], b["Origin"]);
    }

    #[test]
    fn relative_url_is_rejected() {
        assert!(matches!(
            origin_headers("seg-001.ts", "ua"),
            Err(SegmentError::InvalidUrl(_))
        ));
    }
}
