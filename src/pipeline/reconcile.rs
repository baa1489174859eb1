//! Second pass: give plain-named duplicates their fingerprinted twin's output.
//!
//! Runs after the work queue has drained, one file at a time in discovery
//! order. Nothing is minified here; the duplicate receives a byte copy of
//! the twin's minified file (map reference included) and gzip.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::io::{copy, read, rename};
use super::matcher::ContentMatcher;
use super::{FileOutcome, Outcome, ProcessError};
use crate::asset::AssetPaths;
use crate::asset::marker::{has_folder_marker, has_marker};
use crate::asset::paths::site_path;
use crate::config::PipelineConfig;
use crate::debug;

pub struct Reconciler {
    config: Arc<PipelineConfig>,
}

impl Reconciler {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }

    /// Reconcile `files` sequentially, reporting each outcome to `on_done`.
    pub async fn run(
        &self,
        files: &[PathBuf],
        matcher: &ContentMatcher,
        mut on_done: impl FnMut(&FileOutcome),
    ) -> Vec<FileOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            let outcome = FileOutcome::new(path.clone(), self.reconcile(path, matcher).await);
            on_done(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    pub async fn reconcile(
        &self,
        path: &Path,
        matcher: &ContentMatcher,
    ) -> Result<Outcome, ProcessError> {
        let paths = AssetPaths::new(path);

        let content = read(&paths.asset).await?;
        if has_folder_marker(&content, &self.config.assets_folder) {
            debug!("skip"; "{}", path.display());
            return Ok(Outcome::AlreadyProcessed);
        }

        let twin = matcher
            .find(&content)
            .await?
            .and_then(AssetPaths::from_original)
            .ok_or_else(|| ProcessError::NoMatch(path.to_path_buf()))?;

        // The twin's own pipeline may have failed after its rename.
        let twin_map_url = site_path(&self.config.root, &twin.map);
        let twin_done = match read(&twin.asset).await {
            Ok(minified) => has_marker(&minified, &twin_map_url),
            Err(ProcessError::Read(_, e)) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e),
        };
        if !twin_done {
            return Err(ProcessError::SiblingUnprocessed {
                path: path.to_path_buf(),
                sibling: twin.asset,
            });
        }
        // A twin minified with gzip off has nothing to copy.
        if self.config.gzip {
            let exists = tokio::fs::try_exists(&twin.gzip)
                .await
                .map_err(|e| ProcessError::Read(twin.gzip.clone(), e))?;
            if !exists {
                return Err(ProcessError::SiblingMissingGzip {
                    path: path.to_path_buf(),
                    sibling: twin.gzip,
                });
            }
        }

        rename(&paths.asset, &paths.original).await?;
        copy(&twin.asset, &paths.asset).await?;
        if self.config.gzip {
            copy(&twin.gzip, &paths.gzip).await?;
        }

        debug!("reuse"; "{} ← {}", path.display(), twin.asset.display());
        Ok(Outcome::Reused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MARKED: &str = "var a=1;\n//# sourceMappingURL=/assets/app-0123456789abcdef0123456789abcdef.js.map";

    struct Fixture {
        _dir: TempDir,
        config: Arc<PipelineConfig>,
        twin: AssetPaths,
        plain: AssetPaths,
    }

    /// A twin already through the pipeline, plus its plain duplicate.
    fn fixture(gzip: bool) -> Fixture {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("public/assets");
        fs::create_dir_all(&assets).unwrap();

        let twin = AssetPaths::new(&assets.join("app-0123456789abcdef0123456789abcdef.js"));
        fs::write(&twin.original, "var a = 1;\n").unwrap();
        fs::write(&twin.asset, MARKED).unwrap();
        fs::write(&twin.gzip, b"\x1f\x8bfake").unwrap();

        let plain = AssetPaths::new(&assets.join("app.js"));
        fs::write(&plain.asset, "var a = 1;\n").unwrap();

        let config = Arc::new(PipelineConfig::new(dir.path()).with_gzip(gzip));
        Fixture {
            _dir: dir,
            config,
            twin,
            plain,
        }
    }

    fn matcher_for(f: &Fixture) -> ContentMatcher {
        let mut matcher = ContentMatcher::new();
        matcher.insert(b"var a = 1;\n", f.twin.original.clone());
        matcher
    }

    #[tokio::test]
    async fn test_reuses_twin_output() {
        let f = fixture(true);
        let reconciler = Reconciler::new(Arc::clone(&f.config));

        let outcome = reconciler
            .reconcile(&f.plain.asset, &matcher_for(&f))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Reused);
        assert_eq!(fs::read_to_string(&f.plain.asset).unwrap(), MARKED);
        assert_eq!(fs::read_to_string(&f.plain.original).unwrap(), "var a = 1;\n");
        assert_eq!(fs::read(&f.plain.gzip).unwrap(), fs::read(&f.twin.gzip).unwrap());
        // no map of its own
        assert!(!f.plain.map.exists());
    }

    #[tokio::test]
    async fn test_gzip_disabled_skips_gz_copy() {
        let f = fixture(false);
        let reconciler = Reconciler::new(Arc::clone(&f.config));
        reconciler
            .reconcile(&f.plain.asset, &matcher_for(&f))
            .await
            .unwrap();
        assert!(!f.plain.gzip.exists());
    }

    #[tokio::test]
    async fn test_no_match_leaves_file_alone() {
        let f = fixture(true);
        fs::write(&f.plain.asset, "var other = 2;\n").unwrap();
        let reconciler = Reconciler::new(Arc::clone(&f.config));

        let err = reconciler
            .reconcile(&f.plain.asset, &matcher_for(&f))
            .await
            .unwrap_err();

        assert!(matches!(&err, ProcessError::NoMatch(p) if p == &f.plain.asset));
        assert!(err.to_string().contains("app.js"));
        assert!(f.plain.asset.exists());
        assert!(!f.plain.original.exists());
    }

    #[tokio::test]
    async fn test_unprocessed_twin_is_reported() {
        let f = fixture(true);
        fs::write(&f.twin.asset, "var a=1;").unwrap();
        let reconciler = Reconciler::new(Arc::clone(&f.config));

        let err = reconciler
            .reconcile(&f.plain.asset, &matcher_for(&f))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::SiblingUnprocessed { .. }));
        assert!(!f.plain.original.exists());
    }

    #[tokio::test]
    async fn test_missing_twin_output_is_reported() {
        let f = fixture(true);
        fs::remove_file(&f.twin.asset).unwrap();
        let reconciler = Reconciler::new(Arc::clone(&f.config));

        let err = reconciler
            .reconcile(&f.plain.asset, &matcher_for(&f))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::SiblingUnprocessed { .. }));
    }

    #[tokio::test]
    async fn test_twin_without_gzip_leaves_duplicate_alone() {
        let f = fixture(true);
        fs::remove_file(&f.twin.gzip).unwrap();
        let reconciler = Reconciler::new(Arc::clone(&f.config));

        let err = reconciler
            .reconcile(&f.plain.asset, &matcher_for(&f))
            .await
            .unwrap_err();

        assert!(matches!(&err, ProcessError::SiblingMissingGzip { sibling, .. } if sibling == &f.twin.gzip));
        assert!(!f.plain.original.exists());
        assert_eq!(fs::read_to_string(&f.plain.asset).unwrap(), "var a = 1;\n");
    }

    #[tokio::test]
    async fn test_twin_without_gzip_is_fine_when_gzip_disabled() {
        let f = fixture(false);
        fs::remove_file(&f.twin.gzip).unwrap();
        let reconciler = Reconciler::new(Arc::clone(&f.config));

        let outcome = reconciler
            .reconcile(&f.plain.asset, &matcher_for(&f))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Reused);
    }

    #[tokio::test]
    async fn test_bundler_reference_on_duplicate_is_not_processed() {
        let f = fixture(true);
        let source = "var a = 1;\n//# sourceMappingURL=app.js.map";
        fs::write(&f.plain.asset, source).unwrap();
        fs::write(&f.twin.original, source).unwrap();
        let mut matcher = ContentMatcher::new();
        matcher.insert(source.as_bytes(), f.twin.original.clone());
        let reconciler = Reconciler::new(Arc::clone(&f.config));

        let outcome = reconciler.reconcile(&f.plain.asset, &matcher).await.unwrap();
        assert_eq!(outcome, Outcome::Reused);
        assert_eq!(fs::read_to_string(&f.plain.original).unwrap(), source);
    }

    #[tokio::test]
    async fn test_already_processed_duplicate() {
        let f = fixture(true);
        fs::write(&f.plain.asset, MARKED).unwrap();
        let reconciler = Reconciler::new(Arc::clone(&f.config));

        let outcomes = reconciler
            .run(&[f.plain.asset.clone()], &ContentMatcher::new(), |_| {})
            .await;

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0].result, Ok(Outcome::AlreadyProcessed)));
    }
}
