//! Allowlist entries and the uniqueness rules over them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlatformId, Timestamp, ValidationError};

/// One verified link between a platform account and a game identity.
///
/// Created on a successful claim, never mutated, and never deleted by this
/// service. Older files written with `discordId`/`discordName`/`robloxName`
/// keys still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowlistEntry {
    /// Platform account id. Unique across the allowlist.
    #[serde(alias = "discordId")]
    pub platform_id: PlatformId,

    /// Platform display name at verification time. Informational only.
    #[serde(alias = "discordName")]
    pub platform_display_name: String,

    /// Game identity. Unique across the allowlist, ignoring case.
    #[serde(alias = "robloxName")]
    pub game_identity: String,

    pub verified_at: Timestamp,
}

impl AllowlistEntry {
    pub fn new(
        platform_id: PlatformId,
        platform_display_name: impl Into<String>,
        game_identity: impl Into<String>,
        verified_at: Timestamp,
    ) -> Self {
        Self {
            platform_id,
            platform_display_name: platform_display_name.into(),
            game_identity: game_identity.into(),
            verified_at,
        }
    }
}

/// Read-side view over a loaded allowlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    entries: Vec<AllowlistEntry>,
}

impl Allowlist {
    pub fn new(entries: Vec<AllowlistEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AllowlistEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<AllowlistEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `platform_id` already has an entry.
    pub fn is_verified(&self, platform_id: &PlatformId) -> bool {
        self.entries.iter().any(|e| &e.platform_id == platform_id)
    }

    /// Whether `game_identity` is already linked, compared case-insensitively.
    pub fn is_identity_taken(&self, game_identity: &str) -> bool {
        let wanted = game_identity.to_lowercase();
        self.entries
            .iter()
            .any(|e| e.game_identity.to_lowercase() == wanted)
    }

    pub fn push(&mut self, entry: AllowlistEntry) {
        self.entries.push(entry);
    }
}

/// Checks both uniqueness rules over `entries`.
///
/// # Errors
/// `ValidationError::InvalidFormat` naming the first duplicate found.
pub fn check_uniqueness(entries: &[AllowlistEntry]) -> Result<(), ValidationError> {
    let mut platform_ids = std::collections::HashSet::new();
    let mut identities = std::collections::HashSet::new();

    for entry in entries {
        if !platform_ids.insert(entry.platform_id.as_str()) {
            return Err(ValidationError::invalid_format(
                "platform_id",
                format!("duplicate platform id {}", entry.platform_id),
            ));
        }
        if !identities.insert(entry.game_identity.to_lowercase()) {
            return Err(ValidationError::invalid_format(
                "game_identity",
                format!("duplicate game identity {}", entry.game_identity),
            ));
        }
    }

    Ok(())
}
