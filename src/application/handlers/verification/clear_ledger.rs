//! ClearLedgerHandler - Command handler that drops every pending secret.

use crate::domain::verification::{PendingSecretLedger, VerificationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearLedgerResult {
    pub cleared_sessions: usize,
}

pub struct ClearLedgerHandler {
    ledger: PendingSecretLedger,
}

impl ClearLedgerHandler {
    pub fn new(ledger: PendingSecretLedger) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self) -> Result<ClearLedgerResult, VerificationError> {
        let cleared_sessions = self.ledger.clear().await?;
        Ok(ClearLedgerResult { cleared_sessions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySecretLog;
    use crate::domain::verification::ExpirySupervisor;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn clears_records_timers_and_log() {
        let log = InMemorySecretLog::new();
        let ledger = PendingSecretLedger::new(
            Arc::new(log.clone()),
            ExpirySupervisor::new(),
            Duration::from_secs(120),
        );
        ledger.submit("Alice", "a").await.unwrap();
        ledger.submit("Bob", "b").await.unwrap();

        let result = ClearLedgerHandler::new(ledger.clone()).handle().await.unwrap();

        assert_eq!(result.cleared_sessions, 2);
        assert_eq!(ledger.stats().await, Default::default());
        assert_eq!(log.contents(), "");
    }
}
