//! Privilege grants applied after a successful claim.
//!
//! Both effects are best effort and independent. Nothing here can undo the
//! allowlist commit that precedes it.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{PlatformId, RoleId};
use crate::ports::{Capability, PlatformGateway};

/// Platform display names longer than this are rejected by the platform.
pub const DEFAULT_MAX_DISPLAY_NAME_CHARS: usize = 32;

/// Which effects were actually performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GrantOutcome {
    pub role_granted: bool,
    pub renamed: bool,
}

/// Builds `"<original> (@<game identity>)"`.
pub fn compose_display_label(original_name: &str, game_identity: &str) -> String {
    format!("{} (@{})", original_name, game_identity)
}

/// Applies the verified role and the display rename.
pub struct PrivilegeGrantOrchestrator {
    gateway: Arc<dyn PlatformGateway>,
    verified_role: Option<RoleId>,
    max_label_chars: usize,
}

impl PrivilegeGrantOrchestrator {
    pub fn new(gateway: Arc<dyn PlatformGateway>, verified_role: Option<RoleId>) -> Self {
        Self {
            gateway,
            verified_role,
            max_label_chars: DEFAULT_MAX_DISPLAY_NAME_CHARS,
        }
    }

    pub fn with_max_label_chars(mut self, max: usize) -> Self {
        self.max_label_chars = max;
        self
    }

    /// Grants the role and renames `claimant`, each only where allowed.
    ///
    /// Never fails: every platform error downgrades its effect to
    /// "not performed" and is logged.
    pub async fn apply_grants(
        &self,
        claimant: &PlatformId,
        agent: &PlatformId,
        display_label: &str,
    ) -> GrantOutcome {
        let can_grant = self.capability(agent, Capability::GrantRoles).await;
        let can_rename = self.capability(agent, Capability::RenameMembers).await;

        let role_granted = can_grant && self.grant_role(claimant).await;
        let renamed = can_rename && self.rename(claimant, agent, display_label).await;

        tracing::info!(
            member = %claimant,
            role_granted,
            renamed,
            "Privilege grants applied"
        );

        GrantOutcome {
            role_granted,
            renamed,
        }
    }

    async fn capability(&self, agent: &PlatformId, capability: Capability) -> bool {
        match self.gateway.has_capability(agent, capability).await {
            Ok(held) => {
                if !held {
                    tracing::warn!(%capability, "Acting agent lacks capability");
                }
                held
            }
            Err(err) => {
                tracing::warn!(%capability, error = %err, "Capability query failed");
                false
            }
        }
    }

    async fn grant_role(&self, claimant: &PlatformId) -> bool {
        let Some(role) = &self.verified_role else {
            tracing::debug!("No verified role configured, skipping role grant");
            return false;
        };

        match self.gateway.grant_role(claimant, role).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(member = %claimant, role = %role, error = %err, "Role grant failed");
                false
            }
        }
    }

    async fn rename(&self, claimant: &PlatformId, agent: &PlatformId, label: &str) -> bool {
        let chars = label.chars().count();
        if chars > self.max_label_chars {
            tracing::info!(
                length = chars,
                max = self.max_label_chars,
                "Display label too long, skipping rename"
            );
            return false;
        }

        let ranks = futures::future::try_join(
            self.gateway.highest_rank(agent),
            self.gateway.highest_rank(claimant),
        );
        let (agent_rank, member_rank) = match ranks.await {
            Ok(ranks) => ranks,
            Err(err) => {
                tracing::warn!(member = %claimant, error = %err, "Rank lookup failed, skipping rename");
                return false;
            }
        };

        if !agent_rank.outranks(&member_rank) {
            tracing::info!(
                member = %claimant,
                agent_rank = agent_rank.0,
                member_rank = member_rank.0,
                "Agent does not outrank member, skipping rename"
            );
            return false;
        }

        match self.gateway.set_display_name(claimant, label).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(member = %claimant, error = %err, "Rename failed");
                false
            }
        }
    }
}
