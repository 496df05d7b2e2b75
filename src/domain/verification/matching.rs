//! Matching engine: turns a claim into an allowlist entry.
//!
//! The order of checks is fixed: already-verified guard, ledger match,
//! identity uniqueness, commit, consume. A failed uniqueness check leaves
//! the matched secret claimable so the rightful owner can still use it.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::foundation::{PlatformId, Timestamp, ValidationError};
use crate::ports::AllowlistStore;

use super::allowlist::{Allowlist, AllowlistEntry};
use super::ledger::PendingSecretLedger;
use super::pending::validate_field;
use super::VerificationError;

/// A validated identity claim.
#[derive(Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    pub platform_id: PlatformId,
    pub platform_display_name: String,
    pub game_identity: String,
    pub secret: String,
}

impl ClaimRequest {
    /// Trims the game identity and secret, then validates every field.
    pub fn new(
        platform_id: impl Into<String>,
        platform_display_name: impl Into<String>,
        game_identity: &str,
        secret: &str,
    ) -> Result<Self, ValidationError> {
        let platform_id = PlatformId::new(platform_id)?;
        let game_identity = game_identity.trim();
        let secret = secret.trim();
        validate_field("username", game_identity)?;
        validate_field("secret", secret)?;

        Ok(Self {
            platform_id,
            platform_display_name: platform_display_name.into(),
            game_identity: game_identity.to_string(),
            secret: secret.to_string(),
        })
    }
}

impl std::fmt::Debug for ClaimRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimRequest")
            .field("platform_id", &self.platform_id)
            .field("platform_display_name", &self.platform_display_name)
            .field("game_identity", &self.game_identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimResult {
    /// The platform account already has an allowlist entry.
    AlreadyVerified,
    /// No pending submission matches the identity and secret.
    NoMatch,
    /// Another account already holds this game identity.
    IdentityTaken,
    /// The link was committed.
    Success(AllowlistEntry),
}

impl ClaimResult {
    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimResult::AlreadyVerified => "already_verified",
            ClaimResult::NoMatch => "no_match",
            ClaimResult::IdentityTaken => "identity_taken",
            ClaimResult::Success(_) => "success",
        }
    }
}

/// Runs claims one at a time against the ledger and the allowlist store.
pub struct MatchingEngine {
    store: Arc<dyn AllowlistStore>,
    ledger: PendingSecretLedger,
    claim_lock: Mutex<()>,
}

impl MatchingEngine {
    pub fn new(store: Arc<dyn AllowlistStore>, ledger: PendingSecretLedger) -> Self {
        Self {
            store,
            ledger,
            claim_lock: Mutex::new(()),
        }
    }

    pub fn ledger(&self) -> &PendingSecretLedger {
        &self.ledger
    }

    /// Attempts to link `request.platform_id` to `request.game_identity`.
    ///
    /// # Errors
    /// `Storage` if the allowlist cannot be read or written. The ledger
    /// record is only consumed after the allowlist write succeeds.
    pub async fn claim(&self, request: &ClaimRequest) -> Result<ClaimResult, VerificationError> {
        let _serialized = self.claim_lock.lock().await;

        let mut allowlist = Allowlist::new(self.store.load().await?);

        if allowlist.is_verified(&request.platform_id) {
            tracing::info!(platform_id = %request.platform_id, "Claim rejected, already verified");
            return Ok(ClaimResult::AlreadyVerified);
        }

        let Some(record) = self
            .ledger
            .find_match(&request.game_identity, &request.secret)
            .await
        else {
            tracing::info!(
                platform_id = %request.platform_id,
                game_identity = %request.game_identity,
                "Claim found no pending secret"
            );
            return Ok(ClaimResult::NoMatch);
        };

        if allowlist.is_identity_taken(&request.game_identity) {
            tracing::info!(
                platform_id = %request.platform_id,
                game_identity = %request.game_identity,
                "Claim rejected, game identity already linked"
            );
            return Ok(ClaimResult::IdentityTaken);
        }

        let entry = AllowlistEntry::new(
            request.platform_id.clone(),
            request.platform_display_name.clone(),
            request.game_identity.clone(),
            Timestamp::now(),
        );
        allowlist.push(entry.clone());
        self.store.save(allowlist.entries()).await?;

        self.ledger.consume(&record).await;

        tracing::info!(
            platform_id = %entry.platform_id,
            game_identity = %entry.game_identity,
            allowlist_size = allowlist.len(),
            "Identity linked"
        );

        Ok(ClaimResult::Success(entry))
    }
}
