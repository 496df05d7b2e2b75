//! Gateway used when no chat-platform client is attached.

use async_trait::async_trait;

use crate::domain::foundation::{PlatformId, RoleId};
use crate::ports::{Capability, MemberRank, PlatformError, PlatformGateway};

/// Reports every capability as missing, so privilege grants become no-ops
/// while claims still commit to the allowlist.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedPlatformGateway;

impl DetachedPlatformGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlatformGateway for DetachedPlatformGateway {
    async fn has_capability(
        &self,
        _agent: &PlatformId,
        capability: Capability,
    ) -> Result<bool, PlatformError> {
        tracing::warn!(%capability, "No chat platform attached, capability unavailable");
        Ok(false)
    }

    async fn highest_rank(&self, member: &PlatformId) -> Result<MemberRank, PlatformError> {
        Err(PlatformError::MemberNotFound(member.clone()))
    }

    async fn grant_role(&self, _member: &PlatformId, _role: &RoleId) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable("no chat platform attached".to_string()))
    }

    async fn set_display_name(
        &self,
        _member: &PlatformId,
        _name: &str,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable("no chat platform attached".to_string()))
    }
}
