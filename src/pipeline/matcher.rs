//! Content-addressed lookup from raw file bytes to the `.orig.js` holding them.
//!
//! Originals are indexed by blake3 digest; a hit is confirmed by comparing
//! the full bytes before it is returned.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::ProcessError;
use super::io::read;
use crate::asset::AssetPaths;
use crate::{debug, log};

#[derive(Debug, Default)]
pub struct ContentMatcher {
    originals: FxHashMap<blake3::Hash, PathBuf>,
}

impl ContentMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the originals of `fingerprinted` files that exist on disk.
    ///
    /// Files whose pipeline failed before the rename have no original and
    /// are left out; unreadable originals are logged and left out.
    pub async fn from_fingerprinted(fingerprinted: &[PathBuf]) -> Self {
        let mut matcher = Self::new();
        for path in fingerprinted {
            let original = AssetPaths::new(path).original;
            if !tokio::fs::try_exists(&original).await.unwrap_or(false) {
                continue;
            }
            match read(&original).await {
                Ok(content) => matcher.insert(&content, original),
                Err(e) => log!("error"; "{}", e.chain()),
            }
        }
        debug!("match"; "indexed {} originals", matcher.len());
        matcher
    }

    /// Index `original` under its content. A later insert with the same
    /// content replaces the earlier one.
    pub fn insert(&mut self, content: &[u8], original: PathBuf) {
        self.originals.insert(blake3::hash(content), original);
    }

    /// Find the original whose bytes equal `content`.
    pub async fn find(&self, content: &[u8]) -> Result<Option<&Path>, ProcessError> {
        let Some(original) = self.originals.get(&blake3::hash(content)) else {
            return Ok(None);
        };
        let stored = read(original).await?;
        Ok((stored == content).then_some(original.as_path()))
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}
