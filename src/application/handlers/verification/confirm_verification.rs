//! ConfirmVerificationHandler - manual confirmation by session id or game identity.

use crate::domain::foundation::SessionId;
use crate::domain::verification::{ConfirmTarget, PendingSecretLedger, VerificationError};

#[derive(Debug, Clone)]
pub struct ConfirmVerificationCommand {
    pub target: ConfirmTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmVerificationResult {
    pub session_id: SessionId,
    pub game_identity: String,
}

pub struct ConfirmVerificationHandler {
    ledger: PendingSecretLedger,
}

impl ConfirmVerificationHandler {
    pub fn new(ledger: PendingSecretLedger) -> Self {
        Self { ledger }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmVerificationCommand,
    ) -> Result<ConfirmVerificationResult, VerificationError> {
        let record = self.ledger.confirm(&cmd.target).await?;

        Ok(ConfirmVerificationResult {
            session_id: record.session_id,
            game_identity: record.game_identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySecretLog;
    use crate::domain::verification::ExpirySupervisor;
    use std::sync::Arc;
    use std::time::Duration;

    fn setup() -> (ConfirmVerificationHandler, PendingSecretLedger, InMemorySecretLog) {
        let log = InMemorySecretLog::new();
        let ledger = PendingSecretLedger::new(
            Arc::new(log.clone()),
            ExpirySupervisor::new(),
            Duration::from_secs(120),
        );
        (ConfirmVerificationHandler::new(ledger.clone()), ledger, log)
    }

    #[tokio::test]
    async fn confirm_by_session_removes_record_and_line() {
        let (handler, ledger, log) = setup();
        let record = ledger.submit("Alice", "abc").await.unwrap();

        let result = handler
            .handle(ConfirmVerificationCommand {
                target: ConfirmTarget::Session(record.session_id),
            })
            .await
            .unwrap();

        assert_eq!(result.game_identity, "Alice");
        assert!(ledger.list().await.is_empty());
        assert_eq!(log.contents(), "");
    }

    #[tokio::test]
    async fn second_confirm_is_not_found() {
        let (handler, ledger, _) = setup();
        ledger.submit("Alice", "abc").await.unwrap();
        let cmd = ConfirmVerificationCommand {
            target: ConfirmTarget::GameIdentity("Alice".to_string()),
        };

        handler.handle(cmd.clone()).await.unwrap();
        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, VerificationError::NotFound(_)));
    }
}
