// Integration tests: HTTP and WebSocket endpoints

mod common;

use axum_test::TestServer;
use sentinel_monitor::config::AppConfig;
use sentinel_monitor::models::{MonitorSnapshot, Sample, SystemStatus};
use sentinel_monitor::poller::PollStats;
use sentinel_monitor::routes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, watch};

struct TestApp {
    app: axum::Router,
    state_tx: watch::Sender<MonitorSnapshot>,
    tx: broadcast::Sender<MonitorSnapshot>,
}

fn test_app() -> TestApp {
    let config = AppConfig::load_from_str(common::TEST_CONFIG).unwrap();
    let (state_tx, state_rx) = watch::channel(MonitorSnapshot::default());
    let (tx, _) = broadcast::channel(config.publishing.broadcast_capacity);
    let app = routes::app(
        state_rx,
        tx.clone(),
        Arc::new(PollStats::default()),
        Arc::new(AtomicUsize::new(0)),
        config,
    );
    TestApp { app, state_tx, tx }
}

fn critical_snapshot() -> MonitorSnapshot {
    MonitorSnapshot {
        status: SystemStatus::Critical,
        samples: vec![
            Sample::new("10:00:00", 45.2, 46.0),
            Sample::new("10:00:02", 91.5, 95.3),
        ],
        alerts: vec!["⚠️ Alert! CPU: 91.50% | Pred: 95.30%".into()],
    }
}

#[tokio::test]
async fn test_version_endpoint() {
    let t = test_app();
    let server = TestServer::try_new(t.app).unwrap();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("sentinel-monitor")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_state_is_empty_before_first_poll() {
    let t = test_app();
    let server = TestServer::try_new(t.app).unwrap();
    let response = server.get("/api/state").await;
    response.assert_status_ok();
    let snapshot: MonitorSnapshot = response.json();
    assert_eq!(snapshot, MonitorSnapshot::default());
}

#[tokio::test]
async fn test_state_reflects_published_snapshot() {
    let t = test_app();
    t.state_tx.send_replace(critical_snapshot());
    let server = TestServer::try_new(t.app).unwrap();
    let snapshot: MonitorSnapshot = server.get("/api/state").await.json();
    assert_eq!(snapshot, critical_snapshot());
}

#[tokio::test]
async fn test_view_endpoint() {
    let t = test_app();
    t.state_tx.send_replace(critical_snapshot());
    let server = TestServer::try_new(t.app).unwrap();
    let json: serde_json::Value = server.get("/api/view").await.json();
    assert_eq!(json["banner"]["label"], "SYSTEM STATUS: CRITICAL - SCALING UP");
    assert_eq!(json["chart"]["labels"][1], "10:00:02");
    assert_eq!(json["chart"]["actual"]["values"][1], 91.5);
    assert_eq!(json["chart"]["predicted"]["name"], "AI Prediction");
    assert_eq!(json["alerts"][0], "⚠️ Alert! CPU: 91.50% | Pred: 95.30%");
    assert!(json["emptyAlertsMessage"].is_null());
}

#[tokio::test]
async fn test_page_shows_empty_state() {
    let t = test_app();
    let server = TestServer::try_new(t.app).unwrap();
    let response = server.get("/").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("SYSTEM STATUS: NORMAL"));
    assert!(html.contains("No critical actions taken yet..."));
    assert!(html.contains("http-equiv=\"refresh\" content=\"2\""));
}

#[tokio::test]
async fn test_page_shows_alerts() {
    let t = test_app();
    t.state_tx.send_replace(critical_snapshot());
    let server = TestServer::try_new(t.app).unwrap();
    let html = server.get("/").await.text();
    assert!(html.contains("SYSTEM STATUS: CRITICAL - SCALING UP"));
    assert!(html.contains("CPU: 91.50% | Pred: 95.30%"));
    assert!(!html.contains("No critical actions taken yet..."));
}

#[tokio::test]
async fn test_stats_endpoint() {
    let t = test_app();
    let server = TestServer::try_new(t.app).unwrap();
    let json: serde_json::Value = server.get("/api/stats").await.json();
    assert_eq!(json["pollsSucceeded"], 0);
    assert_eq!(json["pollsFailed"], 0);
    assert_eq!(json["wsClients"], 0);
    assert_eq!(json["brainUrl"], "http://localhost:8081/predict");
}

// --- WebSocket tests (require http_transport + ws feature) ---

#[tokio::test]
async fn test_ws_monitor_sends_current_then_published() {
    let t = test_app();
    t.state_tx.send_replace(critical_snapshot());
    let tx = t.tx.clone();
    let server = TestServer::builder().http_transport().try_build(t.app).unwrap();
    let mut ws = server
        .get_websocket("/ws/monitor")
        .await
        .into_websocket()
        .await;

    let current: MonitorSnapshot = serde_json::from_str(&ws.receive_text().await).unwrap();
    assert_eq!(current, critical_snapshot());

    let next = MonitorSnapshot {
        status: SystemStatus::Normal,
        samples: vec![Sample::new("10:00:04", 40.0, 41.0)],
        alerts: current.alerts.clone(),
    };
    tx.send(next.clone()).unwrap();
    let received: MonitorSnapshot = serde_json::from_str(&ws.receive_text().await).unwrap();
    assert_eq!(received, next);
}
