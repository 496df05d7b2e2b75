//! GetPaymentStatusHandler - Query handler for one tracked payment.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::{PaymentRelayError, PaymentRequest};
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct GetPaymentStatusQuery {
    pub payment_id: String,
}

pub struct GetPaymentStatusHandler {
    repository: Arc<dyn PaymentRepository>,
}

impl GetPaymentStatusHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetPaymentStatusQuery,
    ) -> Result<PaymentRequest, PaymentRelayError> {
        let Ok(id) = PaymentId::new(query.payment_id.clone()) else {
            return Err(PaymentRelayError::not_found(query.payment_id));
        };

        self.repository
            .find(&id)
            .await?
            .ok_or_else(|| PaymentRelayError::not_found(query.payment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::payment::InMemoryPaymentRepository;
    use crate::domain::foundation::Timestamp;
    use crate::domain::payment::Money;

    #[tokio::test]
    async fn finds_tracked_payment() {
        let repository = InMemoryPaymentRepository::new();
        let request = PaymentRequest::new(
            PaymentId::new("pi_1").unwrap(),
            "Builder",
            Money::from_minor(100),
            None,
            Timestamp::now(),
        );
        repository.save(&request).await.unwrap();
        let handler = GetPaymentStatusHandler::new(Arc::new(repository));

        let found = handler
            .handle(GetPaymentStatusQuery {
                payment_id: "pi_1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(found, request);
    }

    #[tokio::test]
    async fn unknown_payment_is_not_found() {
        let handler = GetPaymentStatusHandler::new(Arc::new(InMemoryPaymentRepository::new()));

        for id in ["pi_missing", ""] {
            let err = handler
                .handle(GetPaymentStatusQuery {
                    payment_id: id.to_string(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, PaymentRelayError::NotFound(_)));
        }
    }
}
