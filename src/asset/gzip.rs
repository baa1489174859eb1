//! Streaming gzip of a file into a sibling file.

use std::io;
use std::path::Path;

use async_compression::tokio::bufread::GzipEncoder;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufReader};

/// Compress `src` into `dest`, returning the number of compressed bytes.
pub async fn gzip_file(src: &Path, dest: &Path) -> io::Result<u64> {
    let input = BufReader::new(File::open(src).await?);
    let mut encoder = GzipEncoder::new(input);
    let mut output = File::create(dest).await?;
    let written = tokio::io::copy(&mut encoder, &mut output).await?;
    output.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::GzipDecoder;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_gzip_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("app.js");
        let dest = dir.path().join("app.js.gz");
        let content = "var a=1;".repeat(500);
        std::fs::write(&src, &content).unwrap();

        let written = gzip_file(&src, &dest).await.unwrap();
        assert_eq!(written, std::fs::metadata(&dest).unwrap().len());
        assert!(written < content.len() as u64);

        let compressed = std::fs::read(&dest).unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoder = GzipDecoder::new(&compressed[..]);
        let mut out = String::new();
        decoder.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, content);
    }

    #[tokio::test]
    async fn test_gzip_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = gzip_file(&dir.path().join("nope.js"), &dir.path().join("nope.js.gz")).await;
        assert!(result.is_err());
        assert!(!dir.path().join("nope.js.gz").exists());
    }
}
