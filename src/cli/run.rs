//! Run orchestration: config → discover → pipeline → summary.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::CommandFactory;

use crate::{
    asset::{DiscoveredAssets, OxcMinifier, scan_assets},
    config::PipelineConfig,
    debug, log,
    logger::ProgressLine,
    pipeline::{MINIFY_COUNTER, Pipeline, REUSE_COUNTER, RunReport},
    utils::plural_count,
};

use super::Cli;

/// Process the assets of the project named on the command line.
///
/// Returns an error if the configuration is invalid or any file failed.
pub fn run(cli: &Cli) -> Result<()> {
    let config = match PipelineConfig::load(cli) {
        Ok(config) => config,
        Err(err) => {
            log!("error"; "{}", Cli::command().render_usage());
            return Err(err).context("invalid configuration");
        }
    };
    let assets_dir = config.assets_dir();

    let assets = scan_assets(&assets_dir)
        .with_context(|| format!("failed to list assets in `{}`", assets_dir.display()))?;
    debug!(
        "scan";
        "{} fingerprinted, {} plain in {}",
        assets.fingerprinted.len(),
        assets.plain.len(),
        assets_dir.display()
    );

    if assets.is_empty() {
        log!("done"; "no javascript files in {}", assets_dir.display());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let pipeline = Pipeline::new(config, Arc::new(OxcMinifier))?;
    let report = runtime.block_on(run_with_progress(&pipeline, &assets, cli.quiet));

    finish(&report)
}

async fn run_with_progress(
    pipeline: &Pipeline,
    assets: &DiscoveredAssets,
    quiet: bool,
) -> RunReport {
    let progress = (!quiet).then(|| {
        ProgressLine::new(&[
            (MINIFY_COUNTER, assets.fingerprinted.len()),
            (REUSE_COUNTER, assets.plain.len()),
        ])
    });
    let report = pipeline.run(assets, progress.as_ref()).await;
    if let Some(p) = progress {
        p.finish();
    }
    report
}

/// Log the summary and turn failures into the process result.
fn finish(report: &RunReport) -> Result<()> {
    log!("done"; "{}", report.summary());

    if report.is_success() {
        return Ok(());
    }
    for (path, _) in report.failures() {
        log!("failed"; "{}", path.display());
    }
    bail!("{} could not be processed", plural_count(report.failure_count(), "file"))
}
