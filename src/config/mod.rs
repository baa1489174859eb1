//! Pipeline configuration.
//!
//! Settings are resolved once at startup and passed explicitly to the
//! queue, the per-file processor and the reconciler.
//!
//! # Sources
//!
//! | Priority | Source                                  |
//! |----------|-----------------------------------------|
//! | 1        | CLI flags (`-j`, `--gzip`, `--assets`)  |
//! | 2        | `[assets]` table of `minassets.toml`    |
//! | 3        | Defaults (`3`, `true`, `"assets"`)      |
//!
//! ```toml
//! [assets]
//! folder = "assets"
//! concurrency = 3
//! gzip = true
//! ```

mod error;

pub use error::ConfigError;

use crate::cli::Cli;
use serde::Deserialize;
use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "minassets.toml";

/// Directory under the project root holding the served site.
pub const PUBLIC_DIR: &str = "public";

const DEFAULT_ASSETS_FOLDER: &str = "assets";
const DEFAULT_CONCURRENCY: usize = 3;

/// Settings for one run of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Project root (parent of `public/`).
    pub root: PathBuf,
    /// Folder name under `public/` holding the compiled assets.
    pub assets_folder: String,
    /// Maximum number of file pipelines in flight.
    pub concurrency: NonZeroUsize,
    /// Whether to write `.js.gz` copies.
    pub gzip: bool,
}

// ============================================================================
// config file
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    assets: AssetsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssetsSection {
    folder: Option<String>,
    concurrency: Option<usize>,
    gzip: Option<bool>,
}

impl ConfigFile {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Ok(toml::from_str(&content)?)
    }
}

// ============================================================================
// PipelineConfig
// ============================================================================

impl PipelineConfig {
    /// Create a config with default settings for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            assets_folder: DEFAULT_ASSETS_FOLDER.to_string(),
            concurrency: NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN),
            gzip: true,
        }
    }

    /// Builder-style concurrency override, clamped to at least 1.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN);
        self
    }

    /// Builder-style gzip override.
    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    /// Builder-style assets folder override.
    pub fn with_assets_folder(mut self, folder: impl Into<String>) -> Self {
        self.assets_folder = folder.into();
        self
    }

    /// `<root>/public/<assets_folder>`
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(PUBLIC_DIR).join(&self.assets_folder)
    }

    /// Load configuration from CLI arguments and the optional config file.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => ConfigFile::from_path(path)?,
            None => {
                let default_path = cli.root.join(CONFIG_FILE);
                if default_path.is_file() {
                    ConfigFile::from_path(&default_path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let mut config = Self::new(&cli.root);
        let section = file.assets;

        if let Some(folder) = cli.assets_folder.clone().or(section.folder) {
            config.assets_folder = folder;
        }
        if let Some(gzip) = cli.gzip.or(section.gzip) {
            config.gzip = gzip;
        }
        if let Some(n) = cli.concurrency.or(section.concurrency) {
            config.concurrency = NonZeroUsize::new(n).ok_or_else(|| {
                ConfigError::Validation("concurrency must be at least 1".to_string())
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the folder name is sane and the directories exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let folder = self.assets_folder.as_str();
        if folder.is_empty() || folder.contains(['/', '\\']) || folder == "." || folder == ".." {
            return Err(ConfigError::Validation(format!(
                "invalid assets folder name `{folder}`"
            )));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::NotADirectory(self.root.clone()));
        }
        let assets_dir = self.assets_dir();
        if !assets_dir.is_dir() {
            return Err(ConfigError::NotADirectory(assets_dir));
        }
        Ok(())
    }
}
