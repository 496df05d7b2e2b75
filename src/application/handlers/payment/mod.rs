//! Payment relay handlers.

mod create_payment_intent;
mod delete_payment;
mod get_payment_status;
mod handle_payment_webhook;

pub use create_payment_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
    PaymentIntentSettings,
};
pub use delete_payment::{DeletePaymentCommand, DeletePaymentHandler};
pub use get_payment_status::{GetPaymentStatusHandler, GetPaymentStatusQuery};
pub use handle_payment_webhook::{
    CallbackDelivery, HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
    HandlePaymentWebhookResult,
};
