//! libcurl-backed transport: one `Easy` handle per GET.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::StitchConfig;
use crate::retry::SegmentError;

use super::Transport;

/// Optional per-attempt curl settings. `None` keeps libcurl's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlOptions {
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
}

impl CurlOptions {
    pub fn from_config(cfg: &StitchConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout_secs.map(Duration::from_secs),
            timeout: cfg.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Blocking GET via curl. Follows redirects; buffers the whole body in memory.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: CurlOptions,
}

impl CurlTransport {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str, headers: &HashMap<String, String>) -> Result<Vec<u8>, SegmentError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(SegmentError::Curl)?;
        easy.follow_location(true).map_err(SegmentError::Curl)?;
        easy.max_redirections(10).map_err(SegmentError::Curl)?;
        if let Some(d) = self.opts.connect_timeout {
            easy.connect_timeout(d).map_err(SegmentError::Curl)?;
        }
        if let Some(d) = self.opts.timeout {
            easy.timeout(d).map_err(SegmentError::Curl)?;
        }

        if !headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))
                    .map_err(SegmentError::Curl)?;
            }
            easy.http_headers(list).map_err(SegmentError::Curl)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(SegmentError::Curl)?;
            transfer.perform().map_err(SegmentError::Curl)?;
        }

        let code = easy.response_code().map_err(SegmentError::Curl)?;
        if !(200..300).contains(&code) {
            return Err(SegmentError::Http(code));
        }
        Ok(body)
    }
}
