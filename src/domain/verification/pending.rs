//! Pending secret submissions and their durable log representation.
//!
//! A record's log line has the exact shape
//! `[<ISO-8601 timestamp>] Username: <game identity>, Secret: <secret>`.
//! Matching works on that line by substring containment, so a game identity
//! that is a prefix of another identity can match the longer record. That
//! quirk is kept on purpose; callers relying on exact identity equality
//! must compare `game_identity` themselves.

use std::fmt;

use crate::domain::foundation::{SessionId, Timestamp, ValidationError};

/// Longest accepted game identity or secret, counted in characters.
pub const MAX_FIELD_CHARS: usize = 100;

const USERNAME_MARKER: &str = "] Username: ";
const SECRET_MARKER: &str = ", Secret: ";

/// One outstanding secret submission.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingSecretRecord {
    pub session_id: SessionId,
    pub game_identity: String,
    /// Bearer credential. Compared case-sensitively, never logged.
    pub secret: String,
    pub submitted_at: Timestamp,
    /// Exact durable-log line, used when removing the record from the log.
    pub raw_log_line: String,
    /// Set while a manual confirmation is removing the record.
    pub consumed: bool,
}

impl PendingSecretRecord {
    /// Creates a record and its canonical log line. Inputs are assumed valid.
    pub fn new(
        game_identity: impl Into<String>,
        secret: impl Into<String>,
        submitted_at: Timestamp,
    ) -> Self {
        let game_identity = game_identity.into();
        let secret = secret.into();
        let raw_log_line = format_log_line(&submitted_at, &game_identity, &secret);
        Self {
            session_id: SessionId::new(),
            game_identity,
            secret,
            submitted_at,
            raw_log_line,
            consumed: false,
        }
    }

    /// Rebuilds a record from a log line written by [`format_log_line`].
    ///
    /// The original line is kept verbatim so later removal still matches it.
    pub fn from_log_line(line: &str) -> Option<Self> {
        let (submitted_at, game_identity, secret) = parse_log_line(line)?;
        Some(Self {
            session_id: SessionId::new(),
            game_identity,
            secret,
            submitted_at,
            raw_log_line: line.trim().to_string(),
            consumed: false,
        })
    }

    /// Whether the log line contains both `Username: <game_identity>` and
    /// `Secret: <secret>` as literal substrings.
    pub fn matches(&self, game_identity: &str, secret: &str) -> bool {
        line_matches(&self.raw_log_line, game_identity, secret)
    }

    /// When the record stops being claimable.
    pub fn expires_at(&self, window_secs: u64) -> Timestamp {
        self.submitted_at.plus_secs(window_secs)
    }
}

impl fmt::Debug for PendingSecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSecretRecord")
            .field("session_id", &self.session_id)
            .field("game_identity", &self.game_identity)
            .field("secret", &"[REDACTED]")
            .field("submitted_at", &self.submitted_at)
            .field("consumed", &self.consumed)
            .finish()
    }
}

/// Builds the canonical log line, without a trailing newline.
pub fn format_log_line(submitted_at: &Timestamp, game_identity: &str, secret: &str) -> String {
    format!(
        "[{}] Username: {}, Secret: {}",
        submitted_at.to_iso8601(),
        game_identity,
        secret
    )
}

/// Splits a log line into timestamp, game identity and secret.
///
/// The identity ends at the first `, Secret: ` after the username marker.
pub fn parse_log_line(line: &str) -> Option<(Timestamp, String, String)> {
    let line = line.trim();
    let rest = line.strip_prefix('[')?;
    let marker = rest.find(USERNAME_MARKER)?;
    let submitted_at = Timestamp::parse_iso8601(&rest[..marker])?;

    let body = &rest[marker + USERNAME_MARKER.len()..];
    let split = body.find(SECRET_MARKER)?;
    let game_identity = &body[..split];
    let secret = &body[split + SECRET_MARKER.len()..];

    if game_identity.is_empty() || secret.is_empty() {
        return None;
    }

    Some((submitted_at, game_identity.to_string(), secret.to_string()))
}

/// The substring predicate used for claim matching.
pub fn line_matches(line: &str, game_identity: &str, secret: &str) -> bool {
    line.contains(&format!("Username: {}", game_identity))
        && line.contains(&format!("Secret: {}", secret))
}

/// Validates a submitted game identity or secret.
///
/// Rejects empty values, values longer than [`MAX_FIELD_CHARS`] characters,
/// and values containing line breaks (which would split a log record).
/// Whitespace is content: only the empty string counts as empty.
pub fn validate_field(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::empty_field(field));
    }

    let chars = value.chars().count();
    if chars > MAX_FIELD_CHARS {
        return Err(ValidationError::too_long(field, MAX_FIELD_CHARS, chars));
    }

    if value.contains(['\n', '\r']) {
        return Err(ValidationError::invalid_format(
            field,
            "must not contain line breaks",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn fixed_time() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 1, 31, 10, 15, 30).unwrap())
    }

    #[test]
    fn log_line_has_canonical_shape() {
        let record = PendingSecretRecord::new("Alice", "XYZ", fixed_time());
        assert_eq!(
            record.raw_log_line,
            "[2025-01-31T10:15:30.000Z] Username: Alice, Secret: XYZ"
        );
        assert!(!record.consumed);
    }

    #[test]
    fn parse_round_trips_canonical_line() {
        let line = "[2025-01-31T10:15:30.000Z] Username: Alice, Secret: XYZ";
        let (at, identity, secret) = parse_log_line(line).unwrap();
        assert_eq!(at, fixed_time());
        assert_eq!(identity, "Alice");
        assert_eq!(secret, "XYZ");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_log_line("").is_none());
        assert!(parse_log_line("hello world").is_none());
        assert!(parse_log_line("[not-a-date] Username: a, Secret: b").is_none());
        assert!(parse_log_line("[2025-01-31T10:15:30.000Z] Username: a").is_none());
    }

    #[test]
    fn from_log_line_keeps_raw_text() {
        let line = "[2025-01-31T10:15:30.000Z] Username: Alice, Secret: XYZ\n";
        let record = PendingSecretRecord::from_log_line(line).unwrap();
        assert_eq!(record.raw_log_line, line.trim());
        assert_eq!(record.submitted_at, fixed_time());
    }

    #[test]
    fn matches_exact_pair() {
        let record = PendingSecretRecord::new("Alice", "XYZ", fixed_time());
        assert!(record.matches("Alice", "XYZ"));
        assert!(!record.matches("Alice", "xyz"));
        assert!(!record.matches("Bob", "XYZ"));
    }

    #[test]
    fn prefix_identity_matches_longer_record() {
        let record = PendingSecretRecord::new("Alice2", "XYZ", fixed_time());
        assert!(record.matches("Alice", "XYZ"));
    }

    #[test]
    fn debug_redacts_secret() {
        let record = PendingSecretRecord::new("Alice", "hunter2", fixed_time());
        let rendered = format!("{:?}", record);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn expires_at_adds_window() {
        let record = PendingSecretRecord::new("Alice", "XYZ", fixed_time());
        assert_eq!(record.expires_at(120), fixed_time().plus_secs(120));
    }

    #[test]
    fn validate_rejects_only_the_empty_string() {
        assert!(matches!(
            validate_field("username", ""),
            Err(ValidationError::EmptyField { .. })
        ));
        assert!(validate_field("username", "   ").is_ok());
        assert!(validate_field("secret", " x ").is_ok());
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        let hundred_thai = "ก".repeat(100);
        assert!(validate_field("secret", &hundred_thai).is_ok());

        let too_long = "a".repeat(101);
        assert!(matches!(
            validate_field("secret", &too_long),
            Err(ValidationError::TooLong { max: 100, actual: 101, .. })
        ));
    }

    #[test]
    fn validate_rejects_line_breaks() {
        assert!(validate_field("secret", "a\nb").is_err());
        assert!(validate_field("secret", "a\rb").is_err());
    }

    proptest! {
        #[test]
        fn record_matches_its_own_fields(
            identity in "[A-Za-z0-9_]{1,20}",
            secret in "[A-Za-z0-9]{1,20}",
        ) {
            let record = PendingSecretRecord::new(identity.clone(), secret.clone(), fixed_time());
            prop_assert!(record.matches(&identity, &secret));
        }

        #[test]
        fn parse_recovers_formatted_fields(
            identity in "[A-Za-z0-9_ ]{1,20}",
            secret in "[A-Za-z0-9]{1,20}",
        ) {
            prop_assume!(!identity.trim().is_empty());
            let line = format_log_line(&fixed_time(), &identity, &secret);
            let (_, parsed_identity, parsed_secret) = parse_log_line(&line).unwrap();
            prop_assert_eq!(parsed_identity, identity);
            prop_assert_eq!(parsed_secret, secret);
        }

        #[test]
        fn different_secret_never_matches(
            identity in "[A-Za-z]{1,10}",
            secret in "[a-m]{4}",
            other in "[n-z]{4}",
        ) {
            let record = PendingSecretRecord::new(identity.clone(), secret, fixed_time());
            prop_assert!(!record.matches(&identity, &other));
        }
    }
}
