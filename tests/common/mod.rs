// Shared test helpers
#![allow(dead_code)]

use async_trait::async_trait;
use sentinel_monitor::brain_repo::{PollError, PredictionSource};
use sentinel_monitor::models::Prediction;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_CONFIG: &str = r#"
[server]
port = 8080
host = "0.0.0.0"

[brain]
url = "http://localhost:8081/predict"
poll_interval_ms = 2000
request_timeout_ms = 1500

[monitor]
series_capacity = 20
alert_capacity = 5

[publishing]
broadcast_capacity = 16

[monitoring]
stats_log_interval_secs = 60
"#;

pub fn normal(actual: f64, predicted: f64) -> Prediction {
    Prediction::new(actual, predicted, Some("NONE"))
}

pub fn scaling(actual: f64, predicted: f64) -> Prediction {
    Prediction::new(actual, predicted, Some("SCALING"))
}

/// Returns scripted results in order, then fails with a transport error once exhausted.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Prediction, PollError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Prediction, PollError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionSource for ScriptedSource {
    async fn fetch_prediction(&self) -> Result<Prediction, PollError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PollError::Transport("script exhausted".into())))
    }
}

/// Never answers; counts how many requests were started.
#[derive(Default)]
pub struct HangingSource {
    calls: AtomicUsize,
}

impl HangingSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionSource for HangingSource {
    async fn fetch_prediction(&self) -> Result<Prediction, PollError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}
