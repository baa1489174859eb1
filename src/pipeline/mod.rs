//! The two-phase asset pipeline.
//!
//! ```text
//! fingerprinted ──► WorkQueue (≤ N in flight) ──► Processor ─┐
//!                                                            │ drain
//! plain ──────────────────────────► Reconciler ◄── ContentMatcher
//! ```
//!
//! Phase one minifies fingerprinted files concurrently. Phase two starts
//! only once phase one has fully drained, and copies the output of each
//! fingerprinted file to the plain-named duplicates sharing its content.

mod error;
mod io;
mod matcher;
mod processor;
mod queue;
mod reconcile;
mod report;


pub use error::ProcessError;
pub use matcher::ContentMatcher;
pub use processor::Processor;
pub use queue::WorkQueue;
pub use reconcile::Reconciler;
pub use report::{FileOutcome, Outcome, RunReport};

use std::sync::Arc;
use std::time::Instant;

use crate::asset::{DiscoveredAssets, Minify, PathRewriter};
use crate::config::PipelineConfig;
use crate::{debug, log};
use crate::logger::ProgressLine;

/// Progress counter names.
pub const MINIFY_COUNTER: &str = "minify";
pub const REUSE_COUNTER: &str = "reuse";

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    processor: Arc<Processor>,
    queue: WorkQueue,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, minifier: Arc<dyn Minify>) -> Result<Self, regex::Error> {
        let rewriter = PathRewriter::new(&config.assets_folder)?;
        let queue = WorkQueue::new(config.concurrency);
        let config = Arc::new(config);
        let processor = Arc::new(Processor::new(Arc::clone(&config), minifier, rewriter));
        Ok(Self {
            config,
            processor,
            queue,
        })
    }

    /// Process all discovered files and report every outcome.
    pub async fn run(
        &self,
        assets: &DiscoveredAssets,
        progress: Option<&ProgressLine>,
    ) -> RunReport {
        let started = Instant::now();

        let mut outcomes = self
            .queue
            .run(
                assets.fingerprinted.clone(),
                |path| {
                    let processor = Arc::clone(&self.processor);
                    async move { processor.process(&path).await }
                },
                |outcome| finished(outcome, MINIFY_COUNTER, progress),
            )
            .await;

        // Drained: every fingerprinted file is renamed and written, or failed.
        let matcher = ContentMatcher::from_fingerprinted(&assets.fingerprinted).await;
        if matcher.is_empty() && !assets.plain.is_empty() {
            debug!("match"; "no originals to match {} plain files against", assets.plain.len());
        }
        let reconciler = Reconciler::new(Arc::clone(&self.config));
        outcomes.extend(
            reconciler
                .run(&assets.plain, &matcher, |outcome| {
                    finished(outcome, REUSE_COUNTER, progress)
                })
                .await,
        );

        RunReport {
            outcomes,
            elapsed: started.elapsed(),
        }
    }
}

fn finished(outcome: &FileOutcome, counter: &str, progress: Option<&ProgressLine>) {
    if let Err(err) = &outcome.result {
        log!("failed"; "{}", err.chain());
    }
    if let Some(progress) = progress {
        progress.inc(counter);
    }
}
