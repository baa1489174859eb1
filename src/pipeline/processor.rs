//! Single-file processor: check → preserve → minify → rewrite → write → gzip.
//!
//! Steps run strictly in order for one file. Any failure ends that file's
//! pipeline and leaves earlier side effects (notably the `.orig.js` rename)
//! in place.

use std::path::Path;
use std::sync::Arc;

use super::io::{read, rename, write};
use super::{Outcome, ProcessError};
use crate::asset::gzip::gzip_file;
use crate::asset::marker::{has_marker, marker};
use crate::asset::paths::{project_relative, site_path};
use crate::asset::{AssetPaths, Minify, PathRewriter};
use crate::config::PipelineConfig;
use crate::debug;

/// Runs the full pipeline for fingerprinted files.
pub struct Processor {
    config: Arc<PipelineConfig>,
    minifier: Arc<dyn Minify>,
    rewriter: PathRewriter,
}

impl Processor {
    pub fn new(
        config: Arc<PipelineConfig>,
        minifier: Arc<dyn Minify>,
        rewriter: PathRewriter,
    ) -> Self {
        Self {
            config,
            minifier,
            rewriter,
        }
    }

    pub async fn process(&self, path: &Path) -> Result<Outcome, ProcessError> {
        let paths = AssetPaths::new(path);
        let map_url = site_path(&self.config.root, &paths.map);

        // 1. idempotency check
        let current = read(&paths.asset).await?;
        if has_marker(&current, &map_url) {
            debug!("skip"; "{}", path.display());
            return Ok(Outcome::AlreadyProcessed);
        }
        let source = String::from_utf8(current).map_err(|e| {
            ProcessError::Read(
                paths.asset.clone(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        let source_len = source.len();

        // 2. preserve original
        rename(&paths.asset, &paths.original).await?;

        // 3. minify
        let source_name = project_relative(&self.config.root, &paths.original);
        let minified = {
            let minifier = Arc::clone(&self.minifier);
            let map_url = map_url.clone();
            tokio::task::spawn_blocking(move || minifier.minify(&source, &source_name, &map_url))
                .await
                .map_err(|e| ProcessError::Join {
                    path: paths.asset.clone(),
                    message: e.to_string(),
                })?
                .map_err(|message| ProcessError::Minify {
                    path: paths.asset.clone(),
                    message,
                })?
        };

        // 4. rewrite paths, 5. append marker
        let mut code = self.rewriter.rewrite(&minified.code).into_owned();
        code.push_str(&marker(&map_url));
        let map = self.rewriter.rewrite(&minified.map);

        // 6. write code and map together
        tokio::try_join!(
            write(&paths.asset, code.as_bytes()),
            write(&paths.map, map.as_bytes())
        )?;

        // 7. gzip
        if self.config.gzip {
            gzip_file(&paths.asset, &paths.gzip)
                .await
                .map_err(|e| ProcessError::Compress(paths.gzip.clone(), e))?;
            debug!("gzip"; "{}", paths.gzip.display());
        }

        debug!("minify"; "{} ({} → {} bytes)", path.display(), source_len, code.len());
        Ok(Outcome::Minified)
    }
}
