//! Verification handlers.
//!
//! Commands and queries over the pending-secret ledger and the claim
//! pipeline.

mod claim_identity;
mod clear_ledger;
mod confirm_verification;
mod list_sessions;
mod read_log;
mod submit_secret;

pub use claim_identity::{ClaimIdentityCommand, ClaimIdentityHandler, ClaimIdentityResult};
pub use clear_ledger::{ClearLedgerHandler, ClearLedgerResult};
pub use confirm_verification::{
    ConfirmVerificationCommand, ConfirmVerificationHandler, ConfirmVerificationResult,
};
pub use list_sessions::{ListSessionsHandler, ListSessionsResult};
pub use read_log::{ReadLogHandler, ReadLogResult};
pub use submit_secret::{SubmitSecretCommand, SubmitSecretHandler, SubmitSecretResult};
