//! Asset-level building blocks: path derivation, markers, rewriting,
//! minification, compression and discovery.

pub mod gzip;
pub mod marker;
pub mod minify;
pub mod paths;
mod rewrite;
mod scan;

pub use minify::{Minified, Minify, OxcMinifier};
pub use paths::AssetPaths;
pub use rewrite::PathRewriter;
pub use scan::{DiscoveredAssets, list_files, scan_assets};
