//! Per-file outcomes and the end-of-run report.

use std::path::PathBuf;
use std::time::Duration;

use super::ProcessError;
use crate::utils::plural_count;

/// How a file left the pipeline when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Minified, source-mapped (and gzipped when enabled).
    Minified,
    /// Output copied from a content-identical fingerprinted file.
    Reused,
    /// Marker already present; nothing was touched.
    AlreadyProcessed,
}

/// Result of one file's pipeline.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Outcome, ProcessError>,
}

impl FileOutcome {
    pub fn new(path: PathBuf, result: Result<Outcome, ProcessError>) -> Self {
        Self { path, result }
    }

    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Outcomes of both phases of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<FileOutcome>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, Ok(ref got) if *got == outcome))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &ProcessError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Err(err) => Some((&o.path, err)),
            Ok(_) => None,
        })
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// `3 minified, 1 reused, 0 skipped, 1 failed in 0.42s`
    pub fn summary(&self) -> String {
        format!(
            "{} minified, {} reused, {} skipped, {} in {:.2}s",
            self.count(Outcome::Minified),
            self.count(Outcome::Reused),
            self.count(Outcome::AlreadyProcessed),
            failed_label(self.failure_count()),
            self.elapsed.as_secs_f64()
        )
    }
}

fn failed_label(n: usize) -> String {
    if n == 0 {
        "0 failed".to_string()
    } else {
        format!("{} failed", plural_count(n, "file"))
    }
}
