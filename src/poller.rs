// Background poll loop.
// Owns the MonitorState; each tick fetches one prediction, folds it in with `monitor::update`
// and publishes the resulting snapshot. Requests are awaited inside the loop, so polls never
// overlap and missed ticks are skipped.

use crate::brain_repo::PredictionSource;
use crate::models::MonitorSnapshot;
use crate::monitor::{self, MonitorEvent, MonitorState};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{broadcast, oneshot, watch};
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for "no receivers" debug log (avoid logging every tick when no one is on /ws/monitor)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Poll counters shared with the HTTP layer.
#[derive(Debug, Default)]
pub struct PollStats {
    pub polls_succeeded: AtomicU64,
    pub polls_failed: AtomicU64,
    pub alerts_raised: AtomicU64,
}

impl PollStats {
    pub fn succeeded(&self) -> u64 {
        self.polls_succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.polls_failed.load(Ordering::Relaxed)
    }

    pub fn alerts(&self) -> u64 {
        self.alerts_raised.load(Ordering::Relaxed)
    }
}

/// Source, channels, and shutdown for the poller.
pub struct PollerDeps<S: ?Sized> {
    pub source: Arc<S>,
    pub state_tx: watch::Sender<MonitorSnapshot>,
    pub tx: broadcast::Sender<MonitorSnapshot>,
    pub stats: Arc<PollStats>,
    pub ws_connections: Arc<AtomicUsize>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Poll timing, buffer sizes and logging config.
pub struct PollerConfig {
    pub poll_interval_ms: u64,
    pub series_capacity: usize,
    pub alert_capacity: usize,
    /// How often to log poll stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Display format for sample timestamps (local wall clock).
pub fn poll_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

pub fn spawn<S>(deps: PollerDeps<S>, config: PollerConfig) -> tokio::task::JoinHandle<()>
where
    S: PredictionSource + ?Sized + 'static,
{
    let PollerDeps {
        source,
        state_tx,
        tx,
        stats,
        ws_connections,
        mut shutdown_rx,
    } = deps;
    let PollerConfig {
        poll_interval_ms,
        series_capacity,
        alert_capacity,
        stats_log_interval_secs,
    } = config;

    let poller_span = tracing::span!(tracing::Level::DEBUG, "poller", poll_interval_ms);
    tokio::spawn(
        async move {
            let mut state = MonitorState::with_capacities(series_capacity, alert_capacity);
            let mut tick = interval(Duration::from_millis(poll_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // first stats log after one full interval
            stats_log_tick.reset();

            let mut last_no_receivers_log: Option<Instant> = None;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Poller shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ws_clients = ws_connections.load(Ordering::Relaxed),
                            polls_succeeded = stats.succeeded(),
                            polls_failed = stats.failed(),
                            alerts_raised = stats.alerts(),
                            "poller stats"
                        );
                        continue;
                    }
                    _ = tick.tick() => {}
                }

                // Teardown also cancels the in-flight request: the response is dropped unseen.
                let result = tokio::select! {
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Poller shutting down with request in flight");
                        break;
                    }
                    result = source.fetch_prediction() => result,
                };

                let event = match result {
                    Ok(prediction) => MonitorEvent::Polled {
                        timestamp: poll_timestamp(),
                        prediction,
                    },
                    Err(e) => {
                        stats.polls_failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(
                            error = %e,
                            kind = e.kind(),
                            operation = "fetch_prediction",
                            "poll failed; keeping previous state"
                        );
                        MonitorEvent::PollFailed
                    }
                };
                let polled = matches!(event, MonitorEvent::Polled { .. });
                state = monitor::update(state, event);
                // A failed poll leaves the state as it was; nothing new to publish.
                if !polled {
                    continue;
                }
                stats.polls_succeeded.fetch_add(1, Ordering::Relaxed);

                if state.status.is_critical() {
                    stats.alerts_raised.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        operation = "poll",
                        alert = state.alerts.newest().unwrap_or_default(),
                        "scaling action reported"
                    );
                }

                let snapshot = state.snapshot();
                tracing::debug!(
                    status = %snapshot.status,
                    samples = snapshot.samples.len(),
                    alerts = snapshot.alerts.len(),
                    "poll applied"
                );

                state_tx.send_replace(snapshot.clone());
                if tx.send(snapshot).is_err() {
                    let should_log = last_no_receivers_log
                        .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                    if should_log {
                        tracing::debug!(
                            operation = "broadcast_snapshot",
                            "No active WebSocket clients; broadcast channel has no receivers"
                        );
                        last_no_receivers_log = Some(Instant::now());
                    }
                }
            }
        }
        .instrument(poller_span),
    )
}
