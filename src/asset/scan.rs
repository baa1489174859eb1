//! Asset discovery (read-only, no side effects).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;

use super::paths::{is_candidate, is_fingerprinted};

/// Candidate files of one run, split by naming scheme.
///
/// Both lists are sorted by path, which is the order the reconciler uses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiscoveredAssets {
    pub fingerprinted: Vec<PathBuf>,
    pub plain: Vec<PathBuf>,
}

impl DiscoveredAssets {
    /// Split `files` into fingerprinted and plain candidates.
    pub fn classify(files: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut found = Self::default();
        for path in files.into_iter().filter(|p| is_candidate(p)) {
            if is_fingerprinted(&path) {
                found.fingerprinted.push(path);
            } else {
                found.plain.push(path);
            }
        }
        found.fingerprinted.sort();
        found.plain.sort();
        found
    }

    pub fn len(&self) -> usize {
        self.fingerprinted.len() + self.plain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Recursively list every file under `dir`.
///
/// Any traversal error aborts the listing.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("`{}` is not a directory", dir.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort(true).skip_hidden(false) {
        let entry = entry.with_context(|| format!("failed to walk `{}`", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// List and classify the candidate files under `dir`.
pub fn scan_assets(dir: &Path) -> Result<DiscoveredAssets> {
    Ok(DiscoveredAssets::classify(list_files(dir)?))
}
