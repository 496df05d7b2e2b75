//! Payment repository port - storage for tracked payment requests.

use async_trait::async_trait;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::PaymentRequest;

use super::StorageError;

/// Port for tracked payment requests.
///
/// Concurrent updates to the same payment are last-writer-wins.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert or replace the request with the same id.
    async fn save(&self, request: &PaymentRequest) -> Result<(), StorageError>;

    async fn find(&self, id: &PaymentId) -> Result<Option<PaymentRequest>, StorageError>;

    /// Remove a request. Returns `false` if it was not tracked.
    async fn delete(&self, id: &PaymentId) -> Result<bool, StorageError>;

    /// Number of tracked requests.
    async fn count(&self) -> Result<usize, StorageError>;
}
