//! Text-file secret log.
//!
//! One record per line. Appends go straight to the end of the file; removals
//! rewrite the whole file through the atomic temp-and-rename path. An
//! in-process lock serializes read-modify-write cycles so a removal never
//! drops a concurrent append.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::ports::{SecretLog, StorageError};

use super::atomic::{ensure_parent_dir, write_atomic};

/// File-backed [`SecretLog`].
#[derive(Debug)]
pub struct FileSecretLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSecretLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_unlocked(&self) -> Result<String, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(StorageError::io(format!(
                "Failed to read secret log {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl SecretLog for FileSecretLog {
    async fn append(&self, line: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        ensure_parent_dir(&self.path).await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                StorageError::io(format!(
                    "Failed to open secret log {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        file.write_all(record.as_bytes()).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to append to secret log {}: {}",
                self.path.display(),
                e
            ))
        })?;
        file.flush().await.map_err(|e| {
            StorageError::io(format!(
                "Failed to flush secret log {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    async fn remove_line(&self, line: &str) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().await;
        let target = line.trim();
        let contents = self.read_unlocked().await?;

        let mut removed = false;
        let mut kept = String::with_capacity(contents.len());
        for existing in contents.lines() {
            let trimmed = existing.trim();
            if trimmed == target {
                removed = true;
                continue;
            }
            if trimmed.is_empty() {
                continue;
            }
            kept.push_str(existing);
            kept.push('\n');
        }

        if removed {
            write_atomic(&self.path, kept.as_bytes()).await?;
        }
        Ok(removed)
    }

    async fn read_all(&self) -> Result<String, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_unlocked().await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        write_atomic(&self.path, b"").await
    }
}
