// WebSocket handler and stream logic

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::MonitorSnapshot;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements ws connection count on drop (connect = +1, drop = -1).
struct WsConnectionGuard(Arc<AtomicUsize>);

impl Drop for WsConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_monitor(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    // Subscribe before reading the current value so no snapshot published in between is lost.
    let mut rx = state.snapshots_tx.subscribe();
    let current = state.state_rx.borrow().clone();
    let conn_count = state.ws_connections.clone();
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_monitor(socket, current, &mut rx, conn_count).await {
            tracing::info!("Monitor stream error: {}", e);
        }
    })
}

/// Sends the current snapshot, then every published one until the client leaves or stalls.
async fn stream_monitor(
    socket: WebSocket,
    current: MonitorSnapshot,
    rx: &mut broadcast::Receiver<MonitorSnapshot>,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsConnectionGuard(conn_count);
    tracing::info!("Client connected to monitor stream");

    let (mut sender, mut receiver) = socket.split();

    let json = serde_json::to_string(&current)?;
    if !send_with_timeout(&mut sender, Message::Text(json.into())).await {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                let snapshot = match result {
                    Ok(s) => s,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Monitor stream client lagging; skipping snapshots");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let json = serde_json::to_string(&snapshot)?;
                if !send_with_timeout(&mut sender, Message::Text(json.into())).await {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            _ = ping_interval.tick() => {
                if !send_with_timeout(&mut sender, Message::Ping(Bytes::new())).await {
                    break;
                }
            }
        }
    }
    tracing::info!("Client disconnected from monitor stream");
    Ok(())
}

/// False when the client is gone or too slow (send failed or exceeded WS_SEND_TIMEOUT).
async fn send_with_timeout(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    message: Message,
) -> bool {
    matches!(timeout(WS_SEND_TIMEOUT, sender.send(message)).await, Ok(Ok(())))
}
