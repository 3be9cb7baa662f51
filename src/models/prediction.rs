// Decoded prediction payload from the prediction service

use super::SystemStatus;

/// GET /predict body: `{ "current_cpu": <number>, "predicted_cpu": <number>, "action": <string> }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub current_cpu: f64,
    pub predicted_cpu: f64,
    pub action: Option<String>,
}

impl Prediction {
    pub fn new(current_cpu: f64, predicted_cpu: f64, action: Option<&str>) -> Self {
        Self {
            current_cpu,
            predicted_cpu,
            action: action.map(str::to_owned),
        }
    }

    pub fn status(&self) -> SystemStatus {
        SystemStatus::from_action(self.action.as_deref())
    }

    pub fn is_scaling(&self) -> bool {
        self.status().is_critical()
    }
}
