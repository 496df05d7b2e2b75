//! JSON-file allowlist store.
//!
//! The allowlist is a pretty-printed JSON array of entries. Loading never
//! fails on bad content: a missing or empty file becomes `[]`, and content
//! that is not a JSON array is copied to `<file>.backup.<unix millis>`
//! before the file is reset to `[]`.
//!
//! Array elements that do not decode as entries (hand edits, partial
//! records) are skipped on load but kept in the file: `save` writes them
//! back after the decoded entries.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;

use crate::domain::foundation::Timestamp;
use crate::domain::verification::{check_uniqueness, AllowlistEntry};
use crate::ports::{AllowlistStore, StorageError};

use super::atomic::write_atomic;

/// File-backed [`AllowlistStore`].
#[derive(Debug, Clone)]
pub struct JsonAllowlistStore {
    path: PathBuf,
}

impl JsonAllowlistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".backup.{}", Timestamp::now().as_unix_millis()));
        PathBuf::from(name)
    }

    /// Copies unusable content aside and resets the file.
    async fn recover_corrupt(&self, raw: &[u8], reason: &str) -> Result<(), StorageError> {
        let backup = self.backup_path();
        fs::write(&backup, raw).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to back up corrupt allowlist to {}: {}",
                backup.display(),
                e
            ))
        })?;

        tracing::warn!(
            path = %self.path.display(),
            backup = %backup.display(),
            reason,
            "Allowlist content unusable, backed up and reset"
        );

        self.save(&[]).await
    }

    /// Elements of the current file that do not decode as entries.
    ///
    /// Absent or unparseable files have none.
    async fn undecodable_elements(&self) -> Result<Vec<Value>, StorageError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::io(format!(
                    "Failed to read allowlist {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Array(elements)) => Ok(decode_elements(elements).1),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl AllowlistStore for JsonAllowlistStore {
    async fn load(&self) -> Result<Vec<AllowlistEntry>, StorageError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Allowlist missing, creating empty file");
                self.save(&[]).await?;
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StorageError::io(format!(
                    "Failed to read allowlist {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let text = match std::str::from_utf8(&raw) {
            Ok(text) => text,
            Err(_) => {
                self.recover_corrupt(&raw, "not valid UTF-8").await?;
                return Ok(Vec::new());
            }
        };

        if text.trim().is_empty() {
            tracing::info!(path = %self.path.display(), "Allowlist empty, resetting to []");
            self.save(&[]).await?;
            return Ok(Vec::new());
        }

        let elements = match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(elements)) => elements,
            Ok(_) => {
                self.recover_corrupt(&raw, "top-level value is not an array")
                    .await?;
                return Ok(Vec::new());
            }
            Err(e) => {
                self.recover_corrupt(&raw, &e.to_string()).await?;
                return Ok(Vec::new());
            }
        };

        let (entries, undecodable) = decode_elements(elements);
        if !undecodable.is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                skipped = undecodable.len(),
                "Allowlist has elements that are not valid entries, keeping them untouched"
            );
        }
        if let Err(e) = check_uniqueness(&entries) {
            tracing::warn!(path = %self.path.display(), error = %e, "Allowlist has duplicate links");
        }

        Ok(entries)
    }

    async fn save(&self, entries: &[AllowlistEntry]) -> Result<(), StorageError> {
        let kept = self.undecodable_elements().await?;

        let document: Vec<Element<'_>> = entries
            .iter()
            .map(Element::Entry)
            .chain(kept.iter().map(Element::Kept))
            .collect();
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        write_atomic(&self.path, json.as_bytes()).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            kept = kept.len(),
            "Allowlist saved"
        );
        Ok(())
    }
}

/// One element of the written array.
#[derive(Serialize)]
#[serde(untagged)]
enum Element<'a> {
    Entry(&'a AllowlistEntry),
    Kept(&'a Value),
}

/// Splits array elements into decoded entries and the raw elements that
/// failed to decode.
fn decode_elements(elements: Vec<Value>) -> (Vec<AllowlistEntry>, Vec<Value>) {
    let mut entries = Vec::with_capacity(elements.len());
    let mut undecodable = Vec::new();
    for element in elements {
        match AllowlistEntry::deserialize(&element) {
            Ok(entry) => entries.push(entry),
            Err(_) => undecodable.push(element),
        }
    }
    (entries, undecodable)
}
