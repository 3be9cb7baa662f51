// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::models::MonitorSnapshot;
use crate::poller::PollStats;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) state_rx: watch::Receiver<MonitorSnapshot>,
    pub(crate) snapshots_tx: broadcast::Sender<MonitorSnapshot>,
    pub(crate) stats: Arc<PollStats>,
    pub(crate) ws_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

pub fn app(
    state_rx: watch::Receiver<MonitorSnapshot>,
    snapshots_tx: broadcast::Sender<MonitorSnapshot>,
    stats: Arc<PollStats>,
    ws_connections: Arc<AtomicUsize>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        state_rx,
        snapshots_tx,
        stats,
        ws_connections,
        config,
    };
    Router::new()
        .route("/", get(http::page_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/state", get(http::state_handler)) // GET /api/state
        .route("/api/view", get(http::view_handler)) // GET /api/view
        .route("/api/stats", get(http::stats_handler)) // GET /api/stats
        .route("/ws/monitor", get(ws::ws_monitor)) // WS /ws/monitor
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
