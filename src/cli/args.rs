//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Minify, source-map and gzip the javascript assets of a compiled site
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root; assets are read from `<ROOT>/public/<assets>`
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub root: PathBuf,

    /// Maximum number of files processed at the same time
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Write a gzip-compressed copy next to each minified file
    #[arg(short = 'z', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub gzip: Option<bool>,

    /// Assets folder name under `<ROOT>/public`
    #[arg(short, long = "assets", value_name = "NAME")]
    pub assets_folder: Option<String>,

    /// Config file path (default: `<ROOT>/minassets.toml`, optional)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Do not display the progress line
    #[arg(short, long)]
    pub quiet: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
