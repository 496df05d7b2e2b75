//! ReadLogHandler - Query handler exposing the durable secret log.

use crate::domain::verification::{PendingSecretLedger, VerificationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadLogResult {
    pub contents: String,
    /// Non-blank lines in `contents`.
    pub line_count: usize,
    pub active_sessions: usize,
}

pub struct ReadLogHandler {
    ledger: PendingSecretLedger,
}

impl ReadLogHandler {
    pub fn new(ledger: PendingSecretLedger) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self) -> Result<ReadLogResult, VerificationError> {
        let contents = self.ledger.read_log().await?;
        let line_count = contents.lines().filter(|l| !l.trim().is_empty()).count();
        let active_sessions = self.ledger.stats().await.active_sessions;

        Ok(ReadLogResult {
            contents,
            line_count,
            active_sessions,
        })
    }
}
