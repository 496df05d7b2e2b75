//! DeletePaymentHandler - stops tracking a payment.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::PaymentRelayError;
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct DeletePaymentCommand {
    pub payment_id: String,
}

pub struct DeletePaymentHandler {
    repository: Arc<dyn PaymentRepository>,
}

impl DeletePaymentHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeletePaymentCommand) -> Result<(), PaymentRelayError> {
        let Ok(id) = PaymentId::new(cmd.payment_id.clone()) else {
            return Err(PaymentRelayError::not_found(cmd.payment_id));
        };

        if !self.repository.delete(&id).await? {
            return Err(PaymentRelayError::not_found(cmd.payment_id));
        }

        tracing::info!(payment_id = %id, "Payment tracking removed");
        Ok(())
    }
}
