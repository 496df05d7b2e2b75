//! ClaimIdentityHandler - Command handler for platform-side claims.
//!
//! Runs the matching engine and, on success, applies the verified role and
//! the display rename. Grants run after the allowlist commit and cannot
//! undo it.

use std::sync::Arc;

use crate::domain::foundation::PlatformId;
use crate::domain::verification::{
    compose_display_label, ClaimRequest, ClaimResult, GrantOutcome, MatchingEngine,
    PrivilegeGrantOrchestrator, VerificationError,
};

/// Command to claim a game identity for a platform account.
#[derive(Clone)]
pub struct ClaimIdentityCommand {
    pub platform_id: String,
    pub platform_display_name: String,
    pub game_identity: String,
    pub secret: String,
}

impl std::fmt::Debug for ClaimIdentityCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimIdentityCommand")
            .field("platform_id", &self.platform_id)
            .field("platform_display_name", &self.platform_display_name)
            .field("game_identity", &self.game_identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimIdentityResult {
    pub result: ClaimResult,
    /// Present only for a successful claim.
    pub grants: Option<GrantOutcome>,
}

pub struct ClaimIdentityHandler {
    engine: Arc<MatchingEngine>,
    orchestrator: Arc<PrivilegeGrantOrchestrator>,
    /// The bot account acting on the platform. Without it grants are skipped.
    agent_id: Option<PlatformId>,
}

impl ClaimIdentityHandler {
    pub fn new(
        engine: Arc<MatchingEngine>,
        orchestrator: Arc<PrivilegeGrantOrchestrator>,
        agent_id: Option<PlatformId>,
    ) -> Self {
        Self {
            engine,
            orchestrator,
            agent_id,
        }
    }

    pub async fn handle(
        &self,
        cmd: ClaimIdentityCommand,
    ) -> Result<ClaimIdentityResult, VerificationError> {
        let request = ClaimRequest::new(
            cmd.platform_id,
            cmd.platform_display_name,
            &cmd.game_identity,
            &cmd.secret,
        )?;

        let result = self.engine.claim(&request).await?;

        let grants = match &result {
            ClaimResult::Success(entry) => Some(match &self.agent_id {
                Some(agent) => {
                    let label =
                        compose_display_label(&entry.platform_display_name, &entry.game_identity);
                    self.orchestrator
                        .apply_grants(&entry.platform_id, agent, &label)
                        .await
                }
                None => {
                    tracing::warn!(
                        member = %entry.platform_id,
                        "No acting agent configured, skipping privilege grants"
                    );
                    GrantOutcome::default()
                }
            }),
            _ => None,
        };

        Ok(ClaimIdentityResult { result, grants })
    }
}
