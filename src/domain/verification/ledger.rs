//! Pending-secret ledger: the in-memory registry of claimable submissions.
//!
//! The in-memory list is the source of truth for whether a secret can still
//! be claimed. Every record is mirrored as one line in the [`SecretLog`];
//! the log is only read back by [`PendingSecretLedger::replay`].
//!
//! The record list is guarded by an async mutex that is never held across
//! log IO. Expiry callbacks and confirmations both re-check the record under
//! the lock before acting, so an expiry that loses the race to a claim (or
//! the reverse) is a no-op.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::SecretLog;

use super::expiry::{ExpirySupervisor, TimerHandle};
use super::pending::{validate_field, PendingSecretRecord};
use super::VerificationError;

/// How a manual confirmation names its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmTarget {
    Session(SessionId),
    GameIdentity(String),
}

/// Listing view of one pending record. Carries no secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub game_identity: String,
    pub submitted_at: Timestamp,
    pub consumed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerStats {
    pub active_sessions: usize,
    pub pending_timers: usize,
}

/// Outcome of replaying the durable log at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    pub restored: usize,
    pub discarded: usize,
}

struct Slot {
    record: PendingSecretRecord,
    timer: Option<TimerHandle>,
}

struct LedgerInner {
    slots: Mutex<Vec<Slot>>,
    log: Arc<dyn SecretLog>,
    supervisor: ExpirySupervisor,
    expiry: Duration,
}

/// Shared handle to the ledger. Cloning is cheap.
#[derive(Clone)]
pub struct PendingSecretLedger {
    inner: Arc<LedgerInner>,
}

impl PendingSecretLedger {
    pub fn new(log: Arc<dyn SecretLog>, supervisor: ExpirySupervisor, expiry: Duration) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                slots: Mutex::new(Vec::new()),
                log,
                supervisor,
                expiry,
            }),
        }
    }

    pub fn expiry(&self) -> Duration {
        self.inner.expiry
    }

    /// Records a new submission, mirrors it to the log and arms its expiry.
    ///
    /// # Errors
    /// `Validation` for bad input, `Storage` if the log append fails (the
    /// record is then not registered).
    pub async fn submit(
        &self,
        game_identity: &str,
        secret: &str,
    ) -> Result<PendingSecretRecord, VerificationError> {
        validate_field("username", game_identity)?;
        validate_field("secret", secret)?;

        let record = PendingSecretRecord::new(game_identity, secret, Timestamp::now());
        self.inner.log.append(&record.raw_log_line).await?;

        let mut slots = self.inner.slots.lock().await;
        let timer = self.arm_timer(record.session_id, self.inner.expiry);
        slots.push(Slot {
            record: record.clone(),
            timer: Some(timer),
        });

        tracing::info!(
            session_id = %record.session_id,
            game_identity = %record.game_identity,
            secret_len = record.secret.chars().count(),
            "Pending secret recorded"
        );

        Ok(record)
    }

    /// First unconsumed record, in log order, whose line contains both
    /// `Username: <game_identity>` and `Secret: <secret>`.
    pub async fn find_match(&self, game_identity: &str, secret: &str) -> Option<PendingSecretRecord> {
        self.inner
            .slots
            .lock()
            .await
            .iter()
            .find(|slot| !slot.record.consumed && slot.record.matches(game_identity, secret))
            .map(|slot| slot.record.clone())
    }

    /// Removes `record` after a successful claim.
    ///
    /// Returns `false` if the record is already gone. Log removal is best
    /// effort: a failure is logged, not returned.
    pub async fn consume(&self, record: &PendingSecretRecord) -> bool {
        let removed = {
            let mut slots = self.inner.slots.lock().await;
            match slots
                .iter()
                .position(|slot| slot.record.session_id == record.session_id)
            {
                Some(index) => {
                    let slot = slots.remove(index);
                    if let Some(timer) = slot.timer {
                        self.inner.supervisor.cancel(timer);
                    }
                    Some(slot.record)
                }
                None => None,
            }
        };

        let Some(removed) = removed else {
            tracing::debug!(session_id = %record.session_id, "Consume skipped, record already gone");
            return false;
        };

        if let Err(err) = self.inner.log.remove_line(&removed.raw_log_line).await {
            tracing::warn!(
                session_id = %removed.session_id,
                error = %err,
                "Failed to remove consumed record from secret log"
            );
        }

        true
    }

    /// Manually confirms a submission, deleting its log line.
    ///
    /// # Errors
    /// - `NotFound` if no record matches the target
    /// - `AlreadyConsumed` if a confirmation for it is already in flight
    /// - `Storage` if the log line could not be removed; the record stays
    ///   claimable in that case
    pub async fn confirm(
        &self,
        target: &ConfirmTarget,
    ) -> Result<PendingSecretRecord, VerificationError> {
        let record = {
            let mut slots = self.inner.slots.lock().await;
            let is_target = |slot: &Slot| match target {
                ConfirmTarget::Session(id) => &slot.record.session_id == id,
                ConfirmTarget::GameIdentity(name) => &slot.record.game_identity == name,
            };

            let index = slots
                .iter()
                .position(|slot| is_target(slot) && !slot.record.consumed)
                .or_else(|| slots.iter().position(is_target))
                .ok_or_else(|| VerificationError::not_found(describe(target)))?;

            let slot = &mut slots[index];
            if slot.record.consumed {
                return Err(VerificationError::already_consumed(describe(target)));
            }
            slot.record.consumed = true;
            slot.record.clone()
        };

        if let Err(err) = self.inner.log.remove_line(&record.raw_log_line).await {
            let mut slots = self.inner.slots.lock().await;
            if let Some(slot) = slots
                .iter_mut()
                .find(|slot| slot.record.session_id == record.session_id)
            {
                slot.record.consumed = false;
                // The timer may have fired while the record was marked consumed.
                let armed = slot
                    .timer
                    .is_some_and(|timer| self.inner.supervisor.is_armed(timer));
                if !armed {
                    let remaining = self.remaining_lifetime(&slot.record.submitted_at);
                    slot.timer = Some(self.arm_timer(slot.record.session_id, remaining));
                }
            }
            return Err(err.into());
        }

        let mut slots = self.inner.slots.lock().await;
        if let Some(index) = slots
            .iter()
            .position(|slot| slot.record.session_id == record.session_id)
        {
            let slot = slots.remove(index);
            if let Some(timer) = slot.timer {
                self.inner.supervisor.cancel(timer);
            }
        }

        tracing::info!(
            session_id = %record.session_id,
            game_identity = %record.game_identity,
            "Verification confirmed"
        );

        Ok(record)
    }

    /// Expiry callback body. No-op unless the record is still present and
    /// not being confirmed.
    async fn expire(&self, session_id: SessionId) -> bool {
        let expired = {
            let mut slots = self.inner.slots.lock().await;
            match slots
                .iter()
                .position(|slot| slot.record.session_id == session_id && !slot.record.consumed)
            {
                Some(index) => slots.remove(index).record,
                None => return false,
            }
        };

        if let Err(err) = self.inner.log.remove_line(&expired.raw_log_line).await {
            tracing::warn!(
                session_id = %session_id,
                error = %err,
                "Failed to remove expired record from secret log"
            );
        }

        tracing::info!(
            session_id = %session_id,
            game_identity = %expired.game_identity,
            "Pending secret expired"
        );
        true
    }

    /// Time left in the expiry window for a record submitted at `submitted_at`.
    fn remaining_lifetime(&self, submitted_at: &Timestamp) -> Duration {
        let age = Timestamp::now()
            .duration_since(submitted_at)
            .to_std()
            .unwrap_or_default();
        self.inner.expiry.saturating_sub(age)
    }

    fn arm_timer(&self, session_id: SessionId, delay: Duration) -> TimerHandle {
        let ledger: Weak<LedgerInner> = Arc::downgrade(&self.inner);
        self.inner.supervisor.schedule(delay, async move {
            if let Some(inner) = ledger.upgrade() {
                PendingSecretLedger { inner }.expire(session_id).await;
            }
        })
    }

    /// Active records in log order.
    pub async fn list(&self) -> Vec<SessionSummary> {
        self.inner
            .slots
            .lock()
            .await
            .iter()
            .map(|slot| SessionSummary {
                session_id: slot.record.session_id,
                game_identity: slot.record.game_identity.clone(),
                submitted_at: slot.record.submitted_at,
                consumed: slot.record.consumed,
            })
            .collect()
    }

    /// Raw contents of the durable log.
    pub async fn read_log(&self) -> Result<String, VerificationError> {
        Ok(self.inner.log.read_all().await?)
    }

    /// Drops every record, cancels every timer and truncates the log.
    ///
    /// Returns the number of records dropped.
    pub async fn clear(&self) -> Result<usize, VerificationError> {
        let dropped = {
            let mut slots = self.inner.slots.lock().await;
            let dropped = slots.len();
            slots.clear();
            dropped
        };
        let timers = self.inner.supervisor.cancel_all();
        self.inner.log.clear().await?;

        tracing::info!(records = dropped, timers, "Ledger cleared");
        Ok(dropped)
    }

    pub async fn stats(&self) -> LedgerStats {
        LedgerStats {
            active_sessions: self.inner.slots.lock().await.len(),
            pending_timers: self.inner.supervisor.pending_count(),
        }
    }

    /// Restores still-live records from the durable log.
    ///
    /// Lines that do not parse, or whose expiry window has passed, are
    /// removed from the log. Restored records get a timer for their
    /// remaining lifetime. Lines already present in the ledger are skipped.
    pub async fn replay(&self) -> Result<ReplayReport, VerificationError> {
        let contents = self.inner.log.read_all().await?;

        let mut report = ReplayReport::default();
        let mut stale = Vec::new();

        {
            let mut slots = self.inner.slots.lock().await;
            for line in contents.lines().map(str::trim).filter(|l| !l.is_empty()) {
                if slots.iter().any(|slot| slot.record.raw_log_line == line) {
                    continue;
                }

                let Some(record) = PendingSecretRecord::from_log_line(line) else {
                    stale.push(line.to_string());
                    continue;
                };

                let remaining = self.remaining_lifetime(&record.submitted_at);
                if remaining.is_zero() {
                    stale.push(line.to_string());
                    continue;
                }

                let timer = self.arm_timer(record.session_id, remaining);
                slots.push(Slot {
                    record,
                    timer: Some(timer),
                });
                report.restored += 1;
            }
        }

        for line in &stale {
            self.inner.log.remove_line(line).await?;
            report.discarded += 1;
        }

        tracing::info!(
            restored = report.restored,
            discarded = report.discarded,
            "Secret log replayed"
        );
        Ok(report)
    }

    /// Cancels every armed timer. Records stay in the log for the next replay.
    pub fn shutdown(&self) -> usize {
        self.inner.supervisor.cancel_all()
    }
}

fn describe(target: &ConfirmTarget) -> String {
    match target {
        ConfirmTarget::Session(id) => format!("session {}", id),
        ConfirmTarget::GameIdentity(name) => format!("user {}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySecretLog;

    const WINDOW: Duration = Duration::from_secs(120);

    fn ledger_with(log: Arc<InMemorySecretLog>) -> PendingSecretLedger {
        PendingSecretLedger::new(log, ExpirySupervisor::new(), WINDOW)
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn submit_appends_log_and_registers_record() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());

        let record = ledger.submit("Alice", "XYZ").await.unwrap();

        assert!(log.contents().contains("Username: Alice, Secret: XYZ"));
        assert_eq!(ledger.list().await.len(), 1);
        assert_eq!(ledger.stats().await.pending_timers, 1);
        assert_eq!(ledger.find_match("Alice", "XYZ").await, Some(record));
    }

    #[tokio::test]
    async fn submit_accepts_whitespace_only_values() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());

        ledger.submit("   ", "XYZ").await.unwrap();

        assert!(log.contents().contains("Username:    , Secret: XYZ"));
    }

    #[tokio::test]
    async fn submit_rejects_invalid_input() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());

        assert!(matches!(
            ledger.submit("", "XYZ").await,
            Err(VerificationError::Validation(_))
        ));
        assert!(matches!(
            ledger.submit("Alice", &"x".repeat(101)).await,
            Err(VerificationError::Validation(_))
        ));
        assert!(log.contents().is_empty());
        assert!(ledger.list().await.is_empty());
    }

    #[tokio::test]
    async fn submit_fails_when_log_append_fails() {
        let log = Arc::new(InMemorySecretLog::new());
        log.fail_writes(true);
        let ledger = ledger_with(log);

        let result = ledger.submit("Alice", "XYZ").await;

        assert!(matches!(result, Err(VerificationError::Storage(_))));
        assert!(ledger.list().await.is_empty());
    }

    #[tokio::test]
    async fn find_match_returns_first_in_log_order() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log);

        let first = ledger.submit("Alice", "XYZ").await.unwrap();
        let _second = ledger.submit("Alice", "XYZ").await.unwrap();

        let found = ledger.find_match("Alice", "XYZ").await.unwrap();
        assert_eq!(found.session_id, first.session_id);
    }

    #[tokio::test]
    async fn consume_is_idempotent() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        let record = ledger.submit("Alice", "XYZ").await.unwrap();

        assert!(ledger.consume(&record).await);
        assert!(!ledger.consume(&record).await);
        assert!(!ledger.consume(&record).await);

        assert!(ledger.find_match("Alice", "XYZ").await.is_none());
        assert!(!log.contents().contains("Alice"));
        assert_eq!(ledger.stats().await, LedgerStats::default());
    }

    #[tokio::test]
    async fn consume_succeeds_when_log_removal_fails() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        let record = ledger.submit("Alice", "XYZ").await.unwrap();

        log.fail_writes(true);
        assert!(ledger.consume(&record).await);
        assert!(ledger.find_match("Alice", "XYZ").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn unclaimed_record_expires_after_window() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        ledger.submit("Alice", "XYZ").await.unwrap();

        tokio::time::advance(Duration::from_millis(119_999)).await;
        settle().await;
        assert!(ledger.find_match("Alice", "XYZ").await.is_some());

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert!(ledger.find_match("Alice", "XYZ").await.is_none());
        assert!(log.contents().is_empty());
        assert_eq!(ledger.stats().await.pending_timers, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn consumed_record_is_not_touched_by_expiry() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        let record = ledger.submit("Alice", "XYZ").await.unwrap();
        assert!(ledger.consume(&record).await);

        let other = ledger.submit("Bob", "ABC").await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;

        // Late expiry for the consumed record has nothing to act on.
        assert!(!ledger.expire(record.session_id).await);
        assert_eq!(ledger.find_match("Bob", "ABC").await, Some(other));
    }

    #[tokio::test]
    async fn confirm_by_session_removes_record_and_line() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        let record = ledger.submit("Alice", "XYZ").await.unwrap();

        let confirmed = ledger
            .confirm(&ConfirmTarget::Session(record.session_id))
            .await
            .unwrap();

        assert_eq!(confirmed.session_id, record.session_id);
        assert!(ledger.list().await.is_empty());
        assert!(log.contents().is_empty());
    }

    #[tokio::test]
    async fn confirm_by_identity_uses_exact_name() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log);
        ledger.submit("Alice2", "XYZ").await.unwrap();

        let result = ledger
            .confirm(&ConfirmTarget::GameIdentity("Alice".to_string()))
            .await;
        assert!(matches!(result, Err(VerificationError::NotFound(_))));

        assert!(ledger
            .confirm(&ConfirmTarget::GameIdentity("Alice2".to_string()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn second_confirm_is_not_found() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log);
        let record = ledger.submit("Alice", "XYZ").await.unwrap();
        let target = ConfirmTarget::Session(record.session_id);

        ledger.confirm(&target).await.unwrap();
        assert!(matches!(
            ledger.confirm(&target).await,
            Err(VerificationError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn confirm_in_flight_reports_already_consumed() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log);
        let record = ledger.submit("Alice", "XYZ").await.unwrap();

        ledger.inner.slots.lock().await[0].record.consumed = true;

        assert!(matches!(
            ledger.confirm(&ConfirmTarget::Session(record.session_id)).await,
            Err(VerificationError::AlreadyConsumed(_))
        ));
        assert!(ledger.find_match("Alice", "XYZ").await.is_none());
    }

    #[tokio::test]
    async fn failed_confirm_leaves_record_claimable() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        let record = ledger.submit("Alice", "XYZ").await.unwrap();

        log.fail_writes(true);
        let result = ledger.confirm(&ConfirmTarget::Session(record.session_id)).await;

        assert!(matches!(result, Err(VerificationError::Storage(_))));
        assert!(ledger.find_match("Alice", "XYZ").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_confirm_rearms_timer_that_fired_mid_confirm() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        let record = ledger.submit("Alice", "XYZ").await.unwrap();

        // Timer fires while a confirmation holds the record.
        ledger.inner.slots.lock().await[0].record.consumed = true;
        tokio::time::advance(WINDOW + Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(ledger.stats().await.pending_timers, 0);
        ledger.inner.slots.lock().await[0].record.consumed = false;

        log.fail_writes(true);
        let result = ledger.confirm(&ConfirmTarget::Session(record.session_id)).await;

        assert!(matches!(result, Err(VerificationError::Storage(_))));
        assert_eq!(ledger.stats().await.pending_timers, 1);

        tokio::time::advance(WINDOW + Duration::from_secs(1)).await;
        settle().await;
        assert!(ledger.find_match("Alice", "XYZ").await.is_none());
        assert_eq!(ledger.stats().await.active_sessions, 0);
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        ledger.submit("Alice", "XYZ").await.unwrap();
        ledger.submit("Bob", "ABC").await.unwrap();

        assert_eq!(ledger.clear().await.unwrap(), 2);

        assert_eq!(ledger.stats().await, LedgerStats::default());
        assert!(ledger.read_log().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replay_restores_live_lines_and_drops_stale_ones() {
        let now = Timestamp::now();
        let live = crate::domain::verification::format_log_line(&now.minus_secs(30), "Alice", "XYZ");
        let old = crate::domain::verification::format_log_line(&now.minus_secs(600), "Bob", "ABC");
        let log = Arc::new(InMemorySecretLog::with_contents(format!(
            "{}\n{}\ngarbage line\n\n",
            live, old
        )));
        let ledger = ledger_with(log.clone());

        let report = ledger.replay().await.unwrap();

        assert_eq!(report, ReplayReport { restored: 1, discarded: 2 });
        assert!(ledger.find_match("Alice", "XYZ").await.is_some());
        assert!(ledger.find_match("Bob", "ABC").await.is_none());
        assert_eq!(log.contents().trim(), live);

        // A second replay finds nothing new.
        assert_eq!(
            ledger.replay().await.unwrap(),
            ReplayReport { restored: 0, discarded: 0 }
        );
    }

    #[tokio::test]
    async fn shutdown_cancels_timers_but_keeps_log() {
        let log = Arc::new(InMemorySecretLog::new());
        let ledger = ledger_with(log.clone());
        ledger.submit("Alice", "XYZ").await.unwrap();

        assert_eq!(ledger.shutdown(), 1);
        assert!(log.contents().contains("Alice"));
    }
}
