//! Allowlist Store Port - durable record of verified identity links.
//!
//! The store is the only writer of the allowlist file. It has no
//! cross-process locking: two concurrent `save` calls race and the later
//! write wins in full.

use async_trait::async_trait;

use crate::domain::foundation::PlatformId;
use crate::domain::verification::AllowlistEntry;

use super::StorageError;

/// Port for loading and persisting the allowlist.
#[async_trait]
pub trait AllowlistStore: Send + Sync {
    /// Load every entry.
    ///
    /// Fails soft on absent, empty, or corrupt content: those cases yield an
    /// empty list (corrupt content is backed up first). Elements that are
    /// not valid entries are skipped, not discarded. Only genuine IO
    /// failures are returned as errors.
    async fn load(&self) -> Result<Vec<AllowlistEntry>, StorageError>;

    /// Replace the stored allowlist with `entries`.
    ///
    /// Uniqueness is the caller's concern; entries are written as given.
    ///
    /// # Errors
    /// `StorageError::Io` if the write fails.
    async fn save(&self, entries: &[AllowlistEntry]) -> Result<(), StorageError>;

    /// Whether some entry carries `platform_id`.
    async fn is_verified(&self, platform_id: &PlatformId) -> Result<bool, StorageError> {
        Ok(self
            .load()
            .await?
            .iter()
            .any(|entry| &entry.platform_id == platform_id))
    }
}
