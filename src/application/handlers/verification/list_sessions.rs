//! ListSessionsHandler - Query handler for the pending-secret listing.

use crate::domain::verification::{LedgerStats, PendingSecretLedger, SessionSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSessionsResult {
    pub sessions: Vec<SessionSummary>,
    pub stats: LedgerStats,
}

pub struct ListSessionsHandler {
    ledger: PendingSecretLedger,
}

impl ListSessionsHandler {
    pub fn new(ledger: PendingSecretLedger) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self) -> ListSessionsResult {
        ListSessionsResult {
            sessions: self.ledger.list().await,
            stats: self.ledger.stats().await,
        }
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
    async fn lists_in_submission_order() {
        let ledger = PendingSecretLedger::new(
            Arc::new(InMemorySecretLog::new()),
            ExpirySupervisor::new(),
            Duration::from_secs(120),
        );
        ledger.submit("Alice", "a").await.unwrap();
        ledger.submit("Bob", "b").await.unwrap();

        let result = ListSessionsHandler::new(ledger.clone()).handle().await;

        let names: Vec<_> = result
            .sessions
            .iter()
            .map(|s| s.game_identity.as_str())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(result.stats.active_sessions, 2);
        assert_eq!(result.stats.pending_timers, 2);
        ledger.shutdown();
    }
}
