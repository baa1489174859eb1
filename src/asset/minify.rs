//! JavaScript minification with source maps.
//!
//! The pipeline only sees the [`Minify`] trait; [`OxcMinifier`] is the
//! production implementation.

use std::path::PathBuf;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minified code plus its source map (JSON text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minified {
    pub code: String,
    pub map: String,
}

/// A JavaScript minifier.
///
/// `source_name` is recorded as the map's source; `map_url` is the URL the
/// map will be served under. Errors are reported as plain messages.
pub trait Minify: Send + Sync + 'static {
    fn minify(&self, source: &str, source_name: &str, map_url: &str) -> Result<Minified, String>;
}

/// Minifier backed by oxc (mangle + compress + codegen).
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcMinifier;

impl Minify for OxcMinifier {
    fn minify(&self, source: &str, source_name: &str, map_url: &str) -> Result<Minified, String> {
        let allocator = Allocator::default();
        // Classic scripts: top-level bindings are globals other scripts may use,
        // so they are neither mangled nor dropped.
        let source_type = SourceType::script();
        let ret = Parser::new(&allocator, source, source_type).parse();
        if !ret.errors.is_empty() {
            let messages: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
            return Err(messages.join("; "));
        }
        let mut program = ret.program;
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        };
        let ret = Minifier::new(options).minify(&allocator, &mut program);
        let output = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                source_map_path: Some(PathBuf::from(source_name)),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program);

        let map = output
            .map
            .ok_or_else(|| "source map was not generated".to_string())?;
        let map = with_map_file(&map.to_json_string(), map_url)?;

        Ok(Minified {
            code: output.code,
            map,
        })
    }
}

/// Set the map's `file` field to the URL of the generated script.
fn with_map_file(map_json: &str, map_url: &str) -> Result<String, String> {
    let mut value: serde_json::Value =
        serde_json::from_str(map_json).map_err(|e| format!("invalid source map: {e}"))?;
    let file = map_url.strip_suffix(".map").unwrap_or(map_url);
    if let Some(object) = value.as_object_mut() {
        object.insert("file".to_string(), serde_json::Value::from(file));
    }
    serde_json::to_string(&value).map_err(|e| format!("invalid source map: {e}"))
}
