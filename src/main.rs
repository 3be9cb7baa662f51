use anyhow::Result;
use sentinel_monitor::*;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let brain_repo = Arc::new(brain_repo::BrainRepo::new(
        app_config.brain.url.clone(),
        Duration::from_millis(app_config.brain.request_timeout_ms),
    )?);
    tracing::info!(
        brain_url = brain_repo.url(),
        poll_interval_ms = app_config.brain.poll_interval_ms,
        "Polling prediction service"
    );

    let (state_tx, state_rx) = watch::channel(models::MonitorSnapshot::default());
    let (tx, _) =
        broadcast::channel::<models::MonitorSnapshot>(app_config.publishing.broadcast_capacity);
    let stats = Arc::new(poller::PollStats::default());
    let ws_connections = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let poller_handle = poller::spawn(
        poller::PollerDeps {
            source: brain_repo,
            state_tx,
            tx: tx.clone(),
            stats: stats.clone(),
            ws_connections: ws_connections.clone(),
            shutdown_rx,
        },
        poller::PollerConfig {
            poll_interval_ms: app_config.brain.poll_interval_ms,
            series_capacity: app_config.monitor.series_capacity,
            alert_capacity: app_config.monitor.alert_capacity,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(state_rx, tx, stats, ws_connections, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
        }
    }

    let _ = shutdown_tx.send(());
    let _ = poller_handle.await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
