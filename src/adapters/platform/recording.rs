//! Scriptable gateway for tests.
//!
//! Capabilities default to denied; ranks are unknown until set. Successful
//! mutations are recorded in call order.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{PlatformId, RoleId};
use crate::ports::{Capability, MemberRank, PlatformError, PlatformGateway};

/// A mutation the gateway performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayAction {
    GrantRole(PlatformId, RoleId),
    Rename(PlatformId, String),
}

#[derive(Debug, Default)]
struct GatewayState {
    capabilities: HashSet<Capability>,
    ranks: HashMap<PlatformId, MemberRank>,
    fail_mutations: bool,
    actions: Vec<GatewayAction>,
}

#[derive(Debug, Default)]
pub struct RecordingPlatformGateway {
    state: Mutex<GatewayState>,
}

impl RecordingPlatformGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&self, capability: Capability) {
        self.state().capabilities.insert(capability);
    }

    pub fn deny(&self, capability: Capability) {
        self.state().capabilities.remove(&capability);
    }

    pub fn set_rank(&self, member: &PlatformId, rank: MemberRank) {
        self.state().ranks.insert(member.clone(), rank);
    }

    /// Make `grant_role` and `set_display_name` fail.
    pub fn fail_mutations(&self, fail: bool) {
        self.state().fail_mutations = fail;
    }

    pub fn actions(&self) -> Vec<GatewayAction> {
        self.state().actions.clone()
    }

    fn state(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, action: GatewayAction) -> Result<(), PlatformError> {
        let mut state = self.state();
        if state.fail_mutations {
            return Err(PlatformError::Unavailable("simulated platform outage".to_string()));
        }
        state.actions.push(action);
        Ok(())
    }
}

#[async_trait]
impl PlatformGateway for RecordingPlatformGateway {
    async fn has_capability(
        &self,
        _agent: &PlatformId,
        capability: Capability,
    ) -> Result<bool, PlatformError> {
        Ok(self.state().capabilities.contains(&capability))
    }

    async fn highest_rank(&self, member: &PlatformId) -> Result<MemberRank, PlatformError> {
        self.state()
            .ranks
            .get(member)
            .copied()
            .ok_or_else(|| PlatformError::MemberNotFound(member.clone()))
    }

    async fn grant_role(&self, member: &PlatformId, role: &RoleId) -> Result<(), PlatformError> {
        self.record(GatewayAction::GrantRole(member.clone(), role.clone()))
    }

    async fn set_display_name(&self, member: &PlatformId, name: &str) -> Result<(), PlatformError> {
        self.record(GatewayAction::Rename(member.clone(), name.to_string()))
    }
}
