//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
///
/// All of these abort the run before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    #[error("`{0}` is not a directory")]
    NotADirectory(PathBuf),
}
