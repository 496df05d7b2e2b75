//! SubmitSecretHandler - Command handler for game-side secret submissions.

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::verification::{PendingSecretLedger, VerificationError};

/// Command to record a pending secret for a game identity.
#[derive(Clone)]
pub struct SubmitSecretCommand {
    pub game_identity: String,
    pub secret: String,
}

impl std::fmt::Debug for SubmitSecretCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitSecretCommand")
            .field("game_identity", &self.game_identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSecretResult {
    pub session_id: SessionId,
    pub submitted_at: Timestamp,
    pub expires_at: Timestamp,
    /// Length of the claim window in seconds.
    pub expires_in_secs: u64,
}

pub struct SubmitSecretHandler {
    ledger: PendingSecretLedger,
}

impl SubmitSecretHandler {
    pub fn new(ledger: PendingSecretLedger) -> Self {
        Self { ledger }
    }

    pub async fn handle(
        &self,
        cmd: SubmitSecretCommand,
    ) -> Result<SubmitSecretResult, VerificationError> {
        let record = self.ledger.submit(&cmd.game_identity, &cmd.secret).await?;
        let expires_in_secs = self.ledger.expiry().as_secs();

        Ok(SubmitSecretResult {
            session_id: record.session_id,
            submitted_at: record.submitted_at,
            expires_at: record.expires_at(expires_in_secs),
            expires_in_secs,
        })
    }
}
