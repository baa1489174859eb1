//! The source-map reference appended to minified output.
//!
//! The reference doubles as the "already processed" flag. Only the exact
//! form this tool appends counts: bundlers often end their output with a
//! relative `sourceMappingURL` of their own, and those files still need
//! processing.

use super::paths::MAP_SUFFIX;

/// Comment tag introducing the source map reference.
pub const MARKER_TAG: &str = "//# sourceMappingURL=";

/// Marker text appended after minified code.
pub fn marker(map_url: &str) -> String {
    format!("\n{MARKER_TAG}{map_url}")
}

/// Whether `content` ends with exactly the marker for `map_url`.
pub fn has_marker(content: &[u8], map_url: &str) -> bool {
    content.ends_with(marker(map_url).as_bytes())
}

/// Whether `content` ends with a marker pointing at any map under
/// `/<folder>/`.
///
/// Used where the map URL is not known up front: a reused duplicate carries
/// the marker of the file it was copied from.
pub fn has_folder_marker(content: &[u8], folder: &str) -> bool {
    let Some(newline) = content.iter().rposition(|&b| b == b'\n') else {
        return false;
    };
    let Some(url) = content[newline + 1..].strip_prefix(MARKER_TAG.as_bytes()) else {
        return false;
    };
    let prefix = format!("/{folder}/");
    url.len() > prefix.len() + MAP_SUFFIX.len()
        && url.starts_with(prefix.as_bytes())
        && url.ends_with(MAP_SUFFIX.as_bytes())
        && !url.iter().any(u8::is_ascii_whitespace)
}
