//! Line-oriented manifest parsing.

use super::{Manifest, ManifestParseError};

/// Lines starting with this marker are directives or comments.
pub const COMMENT_MARKER: char = '#';

/// Directory portion of `manifest_url`: everything up to and including the last `/`.
pub fn base_url_of(manifest_url: &str) -> &str {
    match manifest_url.rfind('/') {
        Some(i) => &manifest_url[..=i],
        None => "",
    }
}

fn is_absolute(entry: &str) -> bool {
    match url::Url::parse(entry) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Parses manifest `text` fetched from `manifest_url`.
///
/// Blank lines and `#` lines are skipped. Absolute `http(s)` entries are kept
/// verbatim, everything else is appended to the manifest's directory URL.
/// Output order is line order.
pub fn parse_manifest(text: &str, manifest_url: &str) -> Result<Manifest, ManifestParseError> {
    let base = base_url_of(manifest_url);
    let segment_urls: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(|line| {
            if is_absolute(line) {
                line.to_string()
            } else {
                format!("{}{}", base, line)
            }
        })
        .collect();

    if segment_urls.is_empty() {
        return Err(ManifestParseError {
            url: manifest_url.to_string(),
        });
    }

    tracing::debug!(
        manifest = manifest_url,
        segments = segment_urls.len(),
        "parsed manifest"
    );

    Ok(Manifest {
        base_url: base.to_string(),
        segment_urls,
    })
}
