//! Verification domain - linking game identities to platform accounts.
//!
//! A player submits a short-lived secret from the game side. The same secret
//! entered on the chat platform proves both accounts belong to one person.
//!
//! # Pipeline
//!
//! 1. [`PendingSecretLedger::submit`] records the secret and arms expiry
//! 2. [`MatchingEngine::claim`] matches a claim against the ledger and
//!    commits an [`AllowlistEntry`]
//! 3. [`PrivilegeGrantOrchestrator::apply_grants`] grants the role and
//!    rename, best effort
//!
//! Unclaimed secrets are dropped by the [`ExpirySupervisor`] after the
//! expiry window.

mod allowlist;
mod errors;
mod expiry;
mod grants;
mod ledger;
mod matching;
mod pending;

pub use allowlist::{check_uniqueness, Allowlist, AllowlistEntry};
pub use errors::VerificationError;
pub use expiry::{ExpirySupervisor, TimerHandle};
pub use grants::{
    compose_display_label, GrantOutcome, PrivilegeGrantOrchestrator,
    DEFAULT_MAX_DISPLAY_NAME_CHARS,
};
pub use ledger::{ConfirmTarget, LedgerStats, PendingSecretLedger, ReplayReport, SessionSummary};
pub use matching::{ClaimRequest, ClaimResult, MatchingEngine};
pub use pending::{
    format_log_line, line_matches, parse_log_line, validate_field, PendingSecretRecord,
    MAX_FIELD_CHARS,
};
