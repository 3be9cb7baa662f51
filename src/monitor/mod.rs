// Monitor state and the pure poll reducer.
// The poller owns a MonitorState and folds each poll outcome into it with `update`.

mod alerts;
mod series;

pub use alerts::{AlertLog, format_alert};
pub use series::SeriesBuffer;

use crate::models::{MonitorSnapshot, Prediction, SystemStatus};

/// Samples kept for the chart.
pub const SERIES_CAPACITY: usize = 20;

/// Alert lines kept in the log.
pub const ALERT_CAPACITY: usize = 5;

/// Outcome of one poll against the prediction service.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Successful poll; `timestamp` is the display-formatted poll time.
    Polled {
        timestamp: String,
        prediction: Prediction,
    },
    /// Transport, status or decode failure. Leaves the state untouched.
    PollFailed,
}

#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    pub series: SeriesBuffer,
    pub alerts: AlertLog,
    pub status: SystemStatus,
}

impl MonitorState {
    pub fn with_capacities(series_capacity: usize, alert_capacity: usize) -> Self {
        Self {
            series: SeriesBuffer::with_capacity(series_capacity),
            alerts: AlertLog::with_capacity(alert_capacity),
            status: SystemStatus::Normal,
        }
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            status: self.status,
            samples: self.series.to_vec(),
            alerts: self.alerts.to_vec(),
        }
    }
}

/// Folds one poll outcome into the state.
///
/// A successful poll appends exactly one sample and recomputes the status from its action alone
/// (no hysteresis). A scaling action additionally prepends one alert line.
pub fn update(mut state: MonitorState, event: MonitorEvent) -> MonitorState {
    match event {
        MonitorEvent::Polled {
            timestamp,
            prediction,
        } => {
            state.series.append(crate::models::Sample::new(
                timestamp,
                prediction.current_cpu,
                prediction.predicted_cpu,
            ));
            state.status = prediction.status();
            if state.status.is_critical() {
                state
                    .alerts
                    .record(prediction.current_cpu, prediction.predicted_cpu);
            }
            state
        }
        MonitorEvent::PollFailed => state,
    }
}
