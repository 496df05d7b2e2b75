//! In-memory storage adapters for tests.
//!
//! Both adapters follow the same shape as the file-backed ones and can be
//! told to fail writes so error paths are reachable without touching disk.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::verification::AllowlistEntry;
use crate::ports::{AllowlistStore, SecretLog, StorageError};

#[derive(Debug, Default)]
struct SecretLogState {
    lines: Vec<String>,
    fail_writes: bool,
}

/// In-memory [`SecretLog`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretLog {
    state: Arc<Mutex<SecretLogState>>,
}

impl InMemorySecretLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw contents, one record per non-empty line.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let log = Self::new();
        log.state().lines = contents
            .into()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        log
    }

    /// Current contents, lines joined with `\n`.
    pub fn contents(&self) -> String {
        self.state().lines.join("\n")
    }

    /// Make `append`, `remove_line` and `clear` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    fn state(&self) -> MutexGuard<'_, SecretLogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(state: &SecretLogState) -> Result<(), StorageError> {
        if state.fail_writes {
            Err(StorageError::io("simulated secret log write failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SecretLog for InMemorySecretLog {
    async fn append(&self, line: &str) -> Result<(), StorageError> {
        let mut state = self.state();
        Self::check_writable(&state)?;
        state.lines.push(line.to_string());
        Ok(())
    }

    async fn remove_line(&self, line: &str) -> Result<bool, StorageError> {
        let mut state = self.state();
        Self::check_writable(&state)?;
        let target = line.trim();
        let before = state.lines.len();
        state.lines.retain(|existing| existing.trim() != target);
        Ok(state.lines.len() != before)
    }

    async fn read_all(&self) -> Result<String, StorageError> {
        let state = self.state();
        let mut contents = String::new();
        for line in &state.lines {
            contents.push_str(line);
            contents.push('\n');
        }
        Ok(contents)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut state = self.state();
        Self::check_writable(&state)?;
        state.lines.clear();
        Ok(())
    }
}

#[derive(Debug, Default)]
struct AllowlistState {
    entries: Vec<AllowlistEntry>,
    fail_saves: bool,
    saves: usize,
}

/// In-memory [`AllowlistStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryAllowlistStore {
    state: Arc<Mutex<AllowlistState>>,
}

impl InMemoryAllowlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<AllowlistEntry>) -> Self {
        let store = Self::new();
        store.state().entries = entries;
        store
    }

    /// Copy of the stored entries.
    pub fn snapshot(&self) -> Vec<AllowlistEntry> {
        self.state().entries.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state().saves
    }

    pub fn fail_saves(&self, fail: bool) {
        self.state().fail_saves = fail;
    }

    fn state(&self) -> MutexGuard<'_, AllowlistState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AllowlistStore for InMemoryAllowlistStore {
    async fn load(&self) -> Result<Vec<AllowlistEntry>, StorageError> {
        Ok(self.state().entries.clone())
    }

    async fn save(&self, entries: &[AllowlistEntry]) -> Result<(), StorageError> {
        let mut state = self.state();
        if state.fail_saves {
            return Err(StorageError::io("simulated allowlist write failure"));
        }
        state.entries = entries.to_vec();
        state.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PlatformId, Timestamp};

    fn entry(platform_id: &str, identity: &str) -> AllowlistEntry {
        AllowlistEntry::new(
            PlatformId::new(platform_id).unwrap(),
            "display",
            identity,
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn secret_log_round_trips_lines() {
        let log = InMemorySecretLog::with_contents("a\n\nb\n");

        assert_eq!(log.read_all().await.unwrap(), "a\nb\n");
        assert!(log.remove_line(" a ").await.unwrap());
        assert_eq!(log.contents(), "b");
    }

    #[tokio::test]
    async fn secret_log_fail_writes_blocks_mutations_but_not_reads() {
        let log = InMemorySecretLog::with_contents("a");
        log.fail_writes(true);

        assert!(log.append("b").await.is_err());
        assert!(log.remove_line("a").await.is_err());
        assert!(log.clear().await.is_err());
        assert_eq!(log.read_all().await.unwrap(), "a\n");
    }

    #[tokio::test]
    async fn allowlist_store_saves_entries_as_given() {
        let store = InMemoryAllowlistStore::with_entries(vec![entry("p1", "Alice")]);

        store
            .save(&[entry("p1", "Alice"), entry("p1", "Bob")])
            .await
            .unwrap();

        assert_eq!(store.snapshot().len(), 2);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn allowlist_store_fail_saves() {
        let store = InMemoryAllowlistStore::new();
        store.fail_saves(true);

        assert!(matches!(
            store.save(&[entry("p1", "Alice")]).await,
            Err(StorageError::Io(_))
        ));
        store.fail_saves(false);
        store.save(&[entry("p1", "Alice")]).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
