//! Per-file pipeline errors.
//!
//! Every variant names the file it concerns. None of them stop the run:
//! they end one file's pipeline and are collected into the report.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to read `{0}`")]
    Read(PathBuf, #[source] io::Error),

    #[error("failed to rename `{from}` to `{to}`")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write `{0}`")]
    Write(PathBuf, #[source] io::Error),

    #[error("failed to copy `{from}` to `{to}`")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to gzip `{0}`")]
    Compress(PathBuf, #[source] io::Error),

    #[error("failed to minify `{path}`: {message}")]
    Minify { path: PathBuf, message: String },

    #[error("no matching original found for `{0}`")]
    NoMatch(PathBuf),

    #[error("`{sibling}` matches `{path}` but has not been minified")]
    SiblingUnprocessed { path: PathBuf, sibling: PathBuf },

    #[error("`{sibling}` is missing, so `{path}` cannot reuse it")]
    SiblingMissingGzip { path: PathBuf, sibling: PathBuf },

    #[error("pipeline task for `{path}` did not complete: {message}")]
    Join { path: PathBuf, message: String },
}

impl ProcessError {
    /// Error with its source chain on one line.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}
