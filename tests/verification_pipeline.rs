//! Integration tests for the verification pipeline.
//!
//! Runs the HTTP router against the file-backed adapters in a temp dir:
//! 1. Submit writes the secret log, claim writes the allowlist file
//! 2. Expiry removes unclaimed submissions from the log
//! 3. Replay restores live log lines after a restart

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use identity_link::adapters::http::{app_router, VerificationAppState};
use identity_link::adapters::platform::{GatewayAction, RecordingPlatformGateway};
use identity_link::adapters::storage::{FileSecretLog, JsonAllowlistStore};
use identity_link::config::ServerConfig;
use identity_link::domain::foundation::{PlatformId, RoleId, Timestamp};
use identity_link::domain::verification::{
    AllowlistEntry, ExpirySupervisor, MatchingEngine, PendingSecretLedger,
    PrivilegeGrantOrchestrator,
};
use identity_link::ports::{Capability, MemberRank};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Service {
    app: Router,
    ledger: PendingSecretLedger,
    gateway: Arc<RecordingPlatformGateway>,
}

fn log_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("memory-logs-verify.txt")
}

fn allowlist_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("data").join("Whitelist.json")
}

fn start(dir: &TempDir, expiry: Duration) -> Service {
    let ledger = PendingSecretLedger::new(
        Arc::new(FileSecretLog::new(log_path(dir))),
        ExpirySupervisor::new(),
        expiry,
    );
    let engine = Arc::new(MatchingEngine::new(
        Arc::new(JsonAllowlistStore::new(allowlist_path(dir))),
        ledger.clone(),
    ));

    let agent = PlatformId::new("bot").unwrap();
    let gateway = Arc::new(RecordingPlatformGateway::new());
    gateway.allow(Capability::GrantRoles);
    gateway.allow(Capability::RenameMembers);
    gateway.set_rank(&agent, MemberRank(5));
    gateway.set_rank(&PlatformId::new("1001").unwrap(), MemberRank(1));
    gateway.set_rank(&PlatformId::new("1002").unwrap(), MemberRank(1));

    let state = VerificationAppState {
        engine,
        orchestrator: Arc::new(PrivilegeGrantOrchestrator::new(
            gateway.clone(),
            Some(RoleId::new("verified").unwrap()),
        )),
        agent_id: Some(agent),
        expose_error_details: false,
    };

    Service {
        app: app_router(state, None, &ServerConfig::default()),
        ledger,
        gateway,
    }
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn submit(app: &Router, username: &str, secret: &str) {
    let (status, body) = post(app, "/verify", json!({"username": username, "secret": secret})).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

async fn claim(app: &Router, platform_id: &str, username: &str, secret: &str) -> (StatusCode, Value) {
    post(
        app,
        "/verify/claim",
        json!({
            "platform_id": platform_id,
            "platform_display_name": "Player",
            "username": username,
            "secret": secret,
        }),
    )
    .await
}

async fn read_log(path: &Path) -> String {
    tokio::fs::read_to_string(path).await.unwrap_or_default()
}

async fn read_allowlist(dir: &TempDir) -> Vec<AllowlistEntry> {
    let raw = tokio::fs::read_to_string(allowlist_path(dir)).await.unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =============================================================================
// Claim Pipeline
// =============================================================================

#[tokio::test]
async fn submit_then_claim_links_identity_on_disk() {
    let dir = TempDir::new().unwrap();
    let service = start(&dir, Duration::from_secs(120));

    submit(&service.app, "Builder", "XYZ").await;
    assert!(read_log(&log_path(&dir)).await.contains("Username: Builder, Secret: XYZ"));

    let (status, body) = claim(&service.app, "1001", "Builder", "XYZ").await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["result"], "success");
    assert_eq!(read_log(&log_path(&dir)).await.trim(), "");

    let entries = read_allowlist(&dir).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].platform_id.as_str(), "1001");
    assert_eq!(entries[0].game_identity, "Builder");

    assert_eq!(
        service.gateway.actions(),
        vec![
            GatewayAction::GrantRole(
                PlatformId::new("1001").unwrap(),
                RoleId::new("verified").unwrap()
            ),
            GatewayAction::Rename(
                PlatformId::new("1001").unwrap(),
                "Player (@Builder)".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn second_account_cannot_take_linked_identity() {
    let dir = TempDir::new().unwrap();
    let service = start(&dir, Duration::from_secs(120));

    submit(&service.app, "Builder", "XYZ").await;
    claim(&service.app, "1001", "Builder", "XYZ").await;

    submit(&service.app, "builder", "ABC").await;
    let (status, body) = claim(&service.app, "1002", "builder", "ABC").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"], "identity_taken");
    assert_eq!(read_allowlist(&dir).await.len(), 1);
}

#[tokio::test]
async fn secret_is_single_use() {
    let dir = TempDir::new().unwrap();
    let service = start(&dir, Duration::from_secs(120));

    submit(&service.app, "Builder", "XYZ").await;
    claim(&service.app, "1001", "Builder", "XYZ").await;

    let (status, body) = claim(&service.app, "1002", "Builder", "XYZ").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["result"], "no_match");
}

#[tokio::test]
async fn corrupt_allowlist_is_backed_up_and_claim_proceeds() {
    let dir = TempDir::new().unwrap();
    tokio::fs::create_dir_all(dir.path().join("data")).await.unwrap();
    tokio::fs::write(allowlist_path(&dir), "{ not json").await.unwrap();
    let service = start(&dir, Duration::from_secs(120));

    submit(&service.app, "Builder", "XYZ").await;
    let (status, _) = claim(&service.app, "1001", "Builder", "XYZ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(read_allowlist(&dir).await.len(), 1);

    let mut backups = 0;
    let mut entries = tokio::fs::read_dir(dir.path().join("data")).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        if entry.file_name().to_string_lossy().starts_with("Whitelist.json.backup.") {
            backups += 1;
        }
    }
    assert_eq!(backups, 1);
}

#[tokio::test]
async fn hand_edited_allowlist_survives_claims() {
    let dir = TempDir::new().unwrap();
    tokio::fs::create_dir_all(dir.path().join("data")).await.unwrap();
    tokio::fs::write(
        allowlist_path(&dir),
        r#"[
  {"discordId":"42","discordName":"old","robloxName":"Builder","verifiedAt":"2024-05-01T00:00:00.000Z"},
  {"discordId":"42","discordName":"dup","robloxName":"builder","verifiedAt":"2024-05-02T00:00:00.000Z"},
  {"discordId":"43","robloxName":"Manual"}
]"#,
    )
    .await
    .unwrap();
    let service = start(&dir, Duration::from_secs(120));

    submit(&service.app, "Newcomer", "XYZ").await;
    let (status, body) = claim(&service.app, "1002", "Newcomer", "XYZ").await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    let raw: Vec<Value> =
        serde_json::from_str(&tokio::fs::read_to_string(allowlist_path(&dir)).await.unwrap())
            .unwrap();
    assert_eq!(raw.len(), 4);
    assert!(raw.iter().any(|e| e["gameIdentity"] == "Builder"));
    assert!(raw.iter().any(|e| e["gameIdentity"] == "Newcomer"));
    assert!(raw.iter().any(|e| e["robloxName"] == "Manual"));
}

// =============================================================================
// Expiry and Replay
// =============================================================================

#[tokio::test]
async fn unclaimed_submission_expires_from_log() {
    let dir = TempDir::new().unwrap();
    let service = start(&dir, Duration::from_millis(200));

    submit(&service.app, "Builder", "XYZ").await;
    tokio::time::sleep(Duration::from_millis(800)).await;

    assert_eq!(read_log(&log_path(&dir)).await.trim(), "");
    assert!(service.ledger.list().await.is_empty());

    let (status, _) = claim(&service.app, "1001", "Builder", "XYZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn replay_restores_live_lines_and_drops_stale_ones() {
    let dir = TempDir::new().unwrap();
    let fresh = format!(
        "[{}] Username: Builder, Secret: XYZ",
        Timestamp::now().minus_secs(10).to_iso8601()
    );
    let stale = format!(
        "[{}] Username: Old, Secret: ABC",
        Timestamp::now().minus_secs(600).to_iso8601()
    );
    tokio::fs::write(
        log_path(&dir),
        format!("{}\n{}\ngarbage line\n", stale, fresh),
    )
    .await
    .unwrap();

    let service = start(&dir, Duration::from_secs(120));
    let report = service.ledger.replay().await.unwrap();

    assert_eq!(report.restored, 1);
    assert_eq!(report.discarded, 2);
    assert_eq!(read_log(&log_path(&dir)).await.trim(), fresh);

    let (status, body) = claim(&service.app, "1001", "Builder", "XYZ").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

#[tokio::test]
async fn shutdown_cancels_timers_but_keeps_log() {
    let dir = TempDir::new().unwrap();
    let service = start(&dir, Duration::from_secs(120));

    submit(&service.app, "Builder", "XYZ").await;
    assert_eq!(service.ledger.shutdown(), 1);

    assert!(read_log(&log_path(&dir)).await.contains("Username: Builder"));
}
