// Chart sample and published monitor snapshot

use serde::{Deserialize, Serialize};

use super::SystemStatus;

/// One plotted observation: poll time (display-formatted) plus actual and predicted CPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: String,
    pub actual_value: f64,
    pub predicted_value: f64,
}

impl Sample {
    pub fn new(timestamp: impl Into<String>, actual_value: f64, predicted_value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            actual_value,
            predicted_value,
        }
    }
}

/// Read-only copy of the monitor state, published after every successful poll.
/// Samples are oldest first; alerts are newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    pub status: SystemStatus,
    pub samples: Vec<Sample>,
    pub alerts: Vec<String>,
}
