//! Artifact path derivation and file classification.
//!
//! Every artifact of an asset is derived from its path by fixed suffix
//! substitution:
//!
//! ```text
//! public/assets/app-<hash>.js        → minified output (overwritten in place)
//! public/assets/app-<hash>.orig.js   → untouched original
//! public/assets/app-<hash>.js.map    → source map
//! public/assets/app-<hash>.js.gz     → gzip of the minified output
//! ```

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::PUBLIC_DIR;

pub const JS_SUFFIX: &str = ".js";
pub const ORIG_SUFFIX: &str = ".orig.js";
pub const MAP_SUFFIX: &str = ".js.map";
pub const GZIP_SUFFIX: &str = ".js.gz";

/// 32 hex characters anywhere in the file name.
static FINGERPRINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9a-fA-F]{32}").expect("fingerprint regex is valid"));

/// The four paths belonging to one asset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub asset: PathBuf,
    pub original: PathBuf,
    pub map: PathBuf,
    pub gzip: PathBuf,
}

impl AssetPaths {
    pub fn new(asset: &Path) -> Self {
        Self {
            asset: asset.to_path_buf(),
            original: with_js_suffix(asset, ORIG_SUFFIX),
            map: with_js_suffix(asset, MAP_SUFFIX),
            gzip: with_js_suffix(asset, GZIP_SUFFIX),
        }
    }

    /// Recover the asset paths from an `.orig.js` path.
    pub fn from_original(original: &Path) -> Option<Self> {
        let name = original.file_name()?.to_str()?;
        let stem = name.strip_suffix(ORIG_SUFFIX)?;
        Some(Self::new(&original.with_file_name(format!("{stem}{JS_SUFFIX}"))))
    }
}

/// Replace the trailing `.js` of the file name with `suffix`.
fn with_js_suffix(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let stem = name.strip_suffix(JS_SUFFIX).unwrap_or(name.as_ref());
    path.with_file_name(format!("{stem}{suffix}"))
}

/// A `.js` file that is not itself a preserved original.
pub fn is_candidate(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(JS_SUFFIX) && !n.ends_with(ORIG_SUFFIX))
}

/// Whether the file name embeds a 32-hex-character content hash.
pub fn is_fingerprinted(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| FINGERPRINT.is_match(n))
}

/// Path relative to the project root, `/`-separated.
///
/// Used as the source name recorded in source maps.
pub fn project_relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Absolute URL path under which `path` is served.
///
/// `./public/assets/app.js.map` → `/assets/app.js.map`
pub fn site_path(root: &Path, path: &Path) -> String {
    let rel = project_relative(root, path);
    let served = rel
        .strip_prefix(PUBLIC_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(rel.as_str());
    format!("/{served}")
}
