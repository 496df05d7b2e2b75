//! Request and response types for the verification endpoints.
//!
//! Text fields default to empty when absent so that a missing field is
//! reported by domain validation with the field's name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::application::{
    ClaimIdentityResult, ListSessionsResult, ReadLogResult, SubmitSecretResult,
};
use crate::domain::verification::{AllowlistEntry, ClaimResult, SessionSummary};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /verify`, sent by the game.
#[derive(Clone, Default, Deserialize)]
pub struct SubmitSecretRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub secret: String,
}

impl fmt::Debug for SubmitSecretRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitSecretRequest")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /verify/claim`, sent by the platform-side form.
#[derive(Clone, Default, Deserialize)]
pub struct ClaimRequestBody {
    #[serde(default)]
    pub platform_id: String,
    #[serde(default)]
    pub platform_display_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub secret: String,
}

impl fmt::Debug for ClaimRequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimRequestBody")
            .field("platform_id", &self.platform_id)
            .field("platform_display_name", &self.platform_display_name)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /confirm-verification`. One of the two fields is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmVerificationRequest {
    pub session_id: Option<String>,
    pub username: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSecretResponse {
    pub success: bool,
    pub message: String,
    pub session_id: String,
    pub expires_at: String,
    /// Human-readable claim window.
    pub expires_in: String,
}

impl From<SubmitSecretResult> for SubmitSecretResponse {
    fn from(result: SubmitSecretResult) -> Self {
        Self {
            success: true,
            message: "Player verification saved successfully!".to_string(),
            session_id: result.session_id.to_string(),
            expires_at: result.expires_at.to_iso8601(),
            expires_in: expiry_hint(result.expires_in_secs),
        }
    }
}

/// `"2 minutes (or until verified)"` for a 120 second window.
pub fn expiry_hint(secs: u64) -> String {
    let window = match secs {
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{} seconds", s),
    };
    format!("{} (or until verified)", window)
}

/// Allowlist entry as shown to the platform form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowlistEntryView {
    pub platform_id: String,
    pub platform_display_name: String,
    pub username: String,
    pub verified_at: String,
}

impl From<&AllowlistEntry> for AllowlistEntryView {
    fn from(entry: &AllowlistEntry) -> Self {
        Self {
            platform_id: entry.platform_id.to_string(),
            platform_display_name: entry.platform_display_name.clone(),
            username: entry.game_identity.clone(),
            verified_at: entry.verified_at.to_iso8601(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub success: bool,
    /// One of `success`, `already_verified`, `no_match`, `identity_taken`.
    pub result: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<AllowlistEntryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_granted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed: Option<bool>,
}

impl From<&ClaimIdentityResult> for ClaimResponse {
    fn from(outcome: &ClaimIdentityResult) -> Self {
        let grants = outcome.grants.unwrap_or_default();
        let (message, entry) = match &outcome.result {
            ClaimResult::AlreadyVerified => (
                "This account is already verified.".to_string(),
                None,
            ),
            ClaimResult::NoMatch => (
                "No pending verification matches that username and secret. \
                 Submit again from the game and claim it before it expires."
                    .to_string(),
                None,
            ),
            ClaimResult::IdentityTaken => (
                "That username is already linked to another account.".to_string(),
                None,
            ),
            ClaimResult::Success(entry) => {
                let role = if grants.role_granted {
                    "Verified role granted."
                } else {
                    "Verified role could not be granted."
                };
                let rename = if grants.renamed {
                    "Nickname updated."
                } else {
                    "Nickname unchanged."
                };
                (
                    format!("Verified as {}. {} {}", entry.game_identity, role, rename),
                    Some(AllowlistEntryView::from(entry)),
                )
            }
        };

        Self {
            success: matches!(outcome.result, ClaimResult::Success(_)),
            result: outcome.result.kind().to_string(),
            message,
            entry,
            role_granted: outcome.grants.map(|g| g.role_granted),
            renamed: outcome.grants.map(|g| g.renamed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmVerificationResponse {
    pub success: bool,
    pub message: String,
    pub session_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: String,
    pub username: String,
    pub timestamp: String,
    pub verified: bool,
}

impl From<&SessionSummary> for SessionView {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            session_id: summary.session_id.to_string(),
            username: summary.game_identity.clone(),
            timestamp: summary.submitted_at.to_iso8601(),
            verified: summary.consumed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub success: bool,
    pub count: usize,
    pub pending_timers: usize,
    pub sessions: Vec<SessionView>,
}

impl From<ListSessionsResult> for SessionsResponse {
    fn from(result: ListSessionsResult) -> Self {
        Self {
            success: true,
            count: result.sessions.len(),
            pending_timers: result.stats.pending_timers,
            sessions: result.sessions.iter().map(SessionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub success: bool,
    pub count: usize,
    /// Raw log text, or `"No logs found"`.
    pub logs: String,
    pub active_sessions: usize,
}

impl From<ReadLogResult> for LogsResponse {
    fn from(result: ReadLogResult) -> Self {
        let trimmed = result.contents.trim();
        Self {
            success: true,
            count: result.line_count,
            logs: if trimmed.is_empty() {
                "No logs found".to_string()
            } else {
                trimmed.to_string()
            },
            active_sessions: result.active_sessions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearLogsResponse {
    pub success: bool,
    pub message: String,
    pub cleared_sessions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PlatformId, Timestamp};
    use crate::domain::verification::GrantOutcome;

    fn entry() -> AllowlistEntry {
        AllowlistEntry::new(
            PlatformId::new("42").unwrap(),
            "Alice",
            "Builder",
            Timestamp::now(),
        )
    }

    #[test]
    fn expiry_hint_formats_minutes_and_seconds() {
        assert_eq!(expiry_hint(120), "2 minutes (or until verified)");
        assert_eq!(expiry_hint(60), "1 minute (or until verified)");
        assert_eq!(expiry_hint(45), "45 seconds (or until verified)");
    }

    #[test]
    fn submit_request_debug_redacts_secret() {
        let request = SubmitSecretRequest {
            username: "Builder".to_string(),
            secret: "hunter2".to_string(),
        };
        let debug = format!("{:?}", request);
        assert!(debug.contains("Builder"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let request: SubmitSecretRequest = serde_json::from_str("{}").unwrap();
        assert!(request.username.is_empty());
        assert!(request.secret.is_empty());
    }

    #[test]
    fn claim_response_messages_are_distinct() {
        let results = [
            ClaimResult::AlreadyVerified,
            ClaimResult::NoMatch,
            ClaimResult::IdentityTaken,
            ClaimResult::Success(entry()),
        ];
        let messages: Vec<String> = results
            .into_iter()
            .map(|result| {
                let grants = matches!(result, ClaimResult::Success(_)).then(GrantOutcome::default);
                ClaimResponse::from(&ClaimIdentityResult { result, grants }).message
            })
            .collect();

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn success_response_reports_grants() {
        let outcome = ClaimIdentityResult {
            result: ClaimResult::Success(entry()),
            grants: Some(GrantOutcome {
                role_granted: true,
                renamed: false,
            }),
        };

        let response = ClaimResponse::from(&outcome);

        assert!(response.success);
        assert_eq!(response.result, "success");
        assert_eq!(response.role_granted, Some(true));
        assert_eq!(response.renamed, Some(false));
        assert_eq!(response.entry.unwrap().username, "Builder");
        assert!(response.message.contains("Verified role granted."));
    }

    #[test]
    fn conflict_response_omits_grant_fields() {
        let outcome = ClaimIdentityResult {
            result: ClaimResult::IdentityTaken,
            grants: None,
        };

        let json = serde_json::to_value(ClaimResponse::from(&outcome)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["result"], "identity_taken");
        assert!(json.get("role_granted").is_none());
        assert!(json.get("entry").is_none());
    }

    #[test]
    fn empty_log_reads_as_placeholder() {
        let response = LogsResponse::from(ReadLogResult {
            contents: "\n".to_string(),
            line_count: 0,
            active_sessions: 0,
        });
        assert_eq!(response.logs, "No logs found");
    }
}
