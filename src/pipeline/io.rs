//! Async filesystem steps that attach the file path to failures.

use std::path::Path;

use tokio::fs;

use super::ProcessError;

pub async fn read(path: &Path) -> Result<Vec<u8>, ProcessError> {
    fs::read(path)
        .await
        .map_err(|e| ProcessError::Read(path.to_path_buf(), e))
}

pub async fn rename(from: &Path, to: &Path) -> Result<(), ProcessError> {
    fs::rename(from, to)
        .await
        .map_err(|source| ProcessError::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}

pub async fn write(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), ProcessError> {
    fs::write(path, contents)
        .await
        .map_err(|e| ProcessError::Write(path.to_path_buf(), e))
}

pub async fn copy(from: &Path, to: &Path) -> Result<(), ProcessError> {
    fs::copy(from, to)
        .await
        .map(|_| ())
        .map_err(|source| ProcessError::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}
