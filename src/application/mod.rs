//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers change state; query handlers only read it.

pub mod handlers;

pub use handlers::payment::{
    CallbackDelivery, CreatePaymentIntentCommand, CreatePaymentIntentHandler,
    CreatePaymentIntentResult, DeletePaymentCommand, DeletePaymentHandler,
    GetPaymentStatusHandler, GetPaymentStatusQuery, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, HandlePaymentWebhookResult, PaymentIntentSettings,
};
pub use handlers::verification::{
    ClaimIdentityCommand, ClaimIdentityHandler, ClaimIdentityResult, ClearLedgerHandler,
    ClearLedgerResult, ConfirmVerificationCommand, ConfirmVerificationHandler,
    ConfirmVerificationResult, ListSessionsHandler, ListSessionsResult, ReadLogHandler,
    ReadLogResult, SubmitSecretCommand, SubmitSecretHandler, SubmitSecretResult,
};
