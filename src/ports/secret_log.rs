//! Secret Log Port - newline-delimited mirror of the pending-secret ledger.
//!
//! Each record is one line of the form
//! `[<ISO-8601 timestamp>] Username: <game identity>, Secret: <secret>`.
//! The in-memory ledger is the source of truth; the log exists for crash
//! recovery and diagnostics.

use async_trait::async_trait;

use super::StorageError;

/// Port for the durable append log.
#[async_trait]
pub trait SecretLog: Send + Sync {
    /// Append one record. A trailing newline is added by the implementation.
    async fn append(&self, line: &str) -> Result<(), StorageError>;

    /// Remove every line equal to `line` (compared after trimming).
    ///
    /// Returns `true` if at least one line was removed.
    async fn remove_line(&self, line: &str) -> Result<bool, StorageError>;

    /// Raw log contents. An absent log reads as empty.
    async fn read_all(&self) -> Result<String, StorageError>;

    /// Truncate the log to empty.
    async fn clear(&self) -> Result<(), StorageError>;
}
