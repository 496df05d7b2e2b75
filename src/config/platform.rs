//! Chat-platform configuration

use serde::Deserialize;

use crate::domain::foundation::{PlatformId, RoleId};
use crate::domain::verification::DEFAULT_MAX_DISPLAY_NAME_CHARS;

use super::error::ValidationError;

/// Settings for the privilege-grant step
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Role granted on a successful claim. Grants are skipped when unset.
    pub verified_role_id: Option<String>,

    /// Platform id of the acting bot account
    pub agent_id: Option<String>,

    /// Longest display name the platform accepts
    #[serde(default = "default_max_display_name_len")]
    pub max_display_name_len: usize,
}

impl PlatformConfig {
    pub fn verified_role(&self) -> Result<Option<RoleId>, ValidationError> {
        self.verified_role_id
            .as_deref()
            .map(|id| RoleId::new(id).map_err(|_| ValidationError::InvalidPlatformId("verified_role_id")))
            .transpose()
    }

    pub fn agent(&self) -> Result<Option<PlatformId>, ValidationError> {
        self.agent_id
            .as_deref()
            .map(|id| PlatformId::new(id).map_err(|_| ValidationError::InvalidPlatformId("agent_id")))
            .transpose()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.verified_role()?;
        self.agent()?;
        if self.max_display_name_len == 0 {
            return Err(ValidationError::InvalidDisplayNameLimit);
        }
        Ok(())
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            verified_role_id: None,
            agent_id: None,
            max_display_name_len: default_max_display_name_len(),
        }
    }
}

fn default_max_display_name_len() -> usize {
    DEFAULT_MAX_DISPLAY_NAME_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_skip_grants() {
        let config = PlatformConfig::default();
        assert_eq!(config.verified_role().unwrap(), None);
        assert_eq!(config.agent().unwrap(), None);
        assert_eq!(config.max_display_name_len, 32);
    }

    #[test]
    fn parses_ids() {
        let config = PlatformConfig {
            verified_role_id: Some("1234".to_string()),
            agent_id: Some("9876".to_string()),
            ..Default::default()
        };
        assert_eq!(config.verified_role().unwrap().unwrap().as_str(), "1234");
        assert_eq!(config.agent().unwrap().unwrap().as_str(), "9876");
    }

    #[test]
    fn blank_ids_are_rejected() {
        let config = PlatformConfig {
            agent_id: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidPlatformId("agent_id"))
        );
    }
}
