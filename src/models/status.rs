// System status derived from the latest poll

use serde::{Deserialize, Serialize};

/// Action value the prediction service sends while an autoscaling response is in progress.
pub const SCALING_ACTION: &str = "SCALING";

/// Serializes to uppercase JSON ("NORMAL" / "CRITICAL").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SystemStatus {
    #[default]
    Normal,
    Critical,
}

impl SystemStatus {
    /// Critical iff the action is exactly "SCALING"; absent, empty or any other value is Normal.
    pub fn from_action(action: Option<&str>) -> Self {
        match action {
            Some(SCALING_ACTION) => SystemStatus::Critical,
            _ => SystemStatus::Normal,
        }
    }

    pub fn is_critical(self) -> bool {
        self == SystemStatus::Critical
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SystemStatus::Normal => "NORMAL",
            SystemStatus::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_scaling_is_critical() {
        assert_eq!(SystemStatus::from_action(Some("SCALING")), SystemStatus::Critical);
        assert_eq!(SystemStatus::from_action(Some("scaling")), SystemStatus::Normal);
        assert_eq!(SystemStatus::from_action(Some("scale_up")), SystemStatus::Normal);
        assert_eq!(SystemStatus::from_action(Some("")), SystemStatus::Normal);
        assert_eq!(SystemStatus::from_action(None), SystemStatus::Normal);
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(SystemStatus::default(), SystemStatus::Normal);
    }
}
