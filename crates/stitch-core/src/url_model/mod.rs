//! Output filename derivation for reassembled streams.
//!
//! The artifact is named after the manifest: `.../720p/index.m3u8` becomes
//! `index.ts`. Names are sanitized for Linux filesystems.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename_for_linux;

/// Fallback when the manifest URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "stream.ts";

/// Extension given to the reassembled artifact.
const OUTPUT_EXTENSION: &str = "ts";

/// Derives a safe local filename for the artifact of `manifest_url`.
///
/// # Examples
///
/// - `output_filename("https://example.com/show/index.m3u8")` → `"index.ts"`
/// - `output_filename("https://example.com/")` → `"stream.ts"`
pub fn output_filename(manifest_url: &str) -> String {
    let Some(raw) = filename_from_url_path(manifest_url) else {
        return DEFAULT_FILENAME.to_string();
    };

    let stem = match raw.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => raw.as_str(),
    };

    let sanitized = sanitize_filename_for_linux(stem);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        format!("{}.{}", sanitized, OUTPUT_EXTENSION)
    }
}
