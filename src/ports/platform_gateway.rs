//! Platform Gateway Port - capability queries and privileged actions on the
//! chat platform.
//!
//! The concrete chat-platform client is an external collaborator. This port
//! only exposes the facts and actions the privilege-grant step needs:
//! whether the acting agent holds a capability, how members rank in the
//! role hierarchy, and the two side effects (role grant, display rename).

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{PlatformId, RoleId};

/// Permission-gated capabilities the acting agent may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Can add roles to members.
    GrantRoles,
    /// Can change members' display names.
    RenameMembers,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::GrantRoles => write!(f, "grant_roles"),
            Capability::RenameMembers => write!(f, "rename_members"),
        }
    }
}

/// Position of a member's highest role. Larger outranks smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberRank(pub i64);

impl MemberRank {
    pub fn outranks(&self, other: &MemberRank) -> bool {
        self > other
    }
}

/// Failure reported by the chat platform.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("Missing permission: {0}")]
    PermissionDenied(String),

    #[error("Member not found: {0}")]
    MemberNotFound(PlatformId),

    #[error("Platform unavailable: {0}")]
    Unavailable(String),
}

/// Port for chat-platform capability queries and mutations.
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Whether `agent` currently holds `capability`.
    async fn has_capability(
        &self,
        agent: &PlatformId,
        capability: Capability,
    ) -> Result<bool, PlatformError>;

    /// Rank of the member's highest role.
    async fn highest_rank(&self, member: &PlatformId) -> Result<MemberRank, PlatformError>;

    /// Add `role` to `member`.
    async fn grant_role(&self, member: &PlatformId, role: &RoleId) -> Result<(), PlatformError>;

    /// Set `member`'s display name.
    async fn set_display_name(&self, member: &PlatformId, name: &str)
        -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_ordering() {
        assert!(MemberRank(5).outranks(&MemberRank(3)));
        assert!(!MemberRank(3).outranks(&MemberRank(3)));
        assert!(!MemberRank(1).outranks(&MemberRank(3)));
    }

    #[test]
    fn capability_display() {
        assert_eq!(Capability::GrantRoles.to_string(), "grant_roles");
        assert_eq!(Capability::RenameMembers.to_string(), "rename_members");
    }
}
