//! In-memory payment repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::PaymentRequest;
use crate::ports::{PaymentRepository, StorageError};

/// Tracked payments keyed by provider-issued id. Lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<RwLock<HashMap<PaymentId, PaymentRequest>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, request: &PaymentRequest) -> Result<(), StorageError> {
        self.payments
            .write()
            .await
            .insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn find(&self, id: &PaymentId) -> Result<Option<PaymentRequest>, StorageError> {
        Ok(self.payments.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &PaymentId) -> Result<bool, StorageError> {
        Ok(self.payments.write().await.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.payments.read().await.len())
    }
}
