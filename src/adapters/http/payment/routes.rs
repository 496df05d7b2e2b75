//! Axum router configuration for the payment relay.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    create_promptpay, delete_payment, get_payment_status, handle_webhook, PaymentAppState,
};

/// Create the payment router.
///
/// # Routes
/// - `POST /create-promptpay` - Create a payment intent
/// - `POST /webhook` - Stripe events (no auth, signature verified)
/// - `GET /payment-status/:payment_id` - Tracked status
/// - `DELETE /payment/:payment_id` - Stop tracking
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new()
        .route("/create-promptpay", post(create_promptpay))
        .route("/webhook", post(handle_webhook))
        .route("/payment-status/:payment_id", get(get_payment_status))
        .route("/payment/:payment_id", delete(delete_payment))
}
