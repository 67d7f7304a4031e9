//! Linux-safe filename sanitization.

/// Linux NAME_MAX in bytes.
const NAME_MAX: usize = 255;

fn is_separator_like(c: char) -> bool {
    c == '/' || c == '\\' || c == ' ' || c == '\t' || c.is_control()
}

/// Makes `name` safe as a single path component on Linux.
///
/// Separators, whitespace and control characters become `_` (runs collapse
/// to one), leading/trailing dots and underscores are trimmed, and the result
/// is cut to 255 bytes on a char boundary.
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_separator_like(c) {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
