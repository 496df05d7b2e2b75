//! Write-to-temp-then-rename helper shared by the file adapters.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::StorageError;

/// Replaces `path` with `contents` so readers never observe a partial file.
///
/// 1. Write to a uniquely named sibling temp file
/// 2. Sync to disk
/// 3. Rename over `path`
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    ensure_parent_dir(path).await?;

    let temp_path = temp_path_for(path);
    let mut file = fs::File::create(&temp_path).await.map_err(|e| {
        StorageError::io(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.write_all(contents).await.map_err(|e| {
        StorageError::io(format!(
            "Failed to write temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::io(format!(
            "Failed to sync temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::io(format!(
            "Failed to rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )));
    }

    Ok(())
}

/// Creates the parent directory of `path` if it has one.
pub async fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))
        }),
        _ => Ok(()),
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_and_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/file.json");

        write_atomic(&path, b"[]").await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn replaces_existing_contents_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "old contents that are longer").await.unwrap();

        write_atomic(&path, b"new").await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "new");
        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["file.txt".to_string()]);
    }
}
