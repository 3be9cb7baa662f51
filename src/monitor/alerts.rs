// Most-recent-first alert log

use std::collections::VecDeque;

/// Formats an alert line with both values at fixed 2-decimal precision (locale independent).
pub fn format_alert(actual: f64, predicted: f64) -> String {
    format!("⚠️ Alert! CPU: {:.2}% | Pred: {:.2}%", actual, predicted)
}

/// Newest entry at the head; the oldest (tail) entry is dropped once length exceeds capacity.
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::with_capacity(super::ALERT_CAPACITY)
    }
}

impl AlertLog {
    /// Capacity is clamped to at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepends a formatted alert for the given values. Identical consecutive alerts are kept.
    pub fn record(&mut self, actual: f64, predicted: f64) {
        self.push(format_alert(actual, predicted));
    }

    pub fn push(&mut self, entry: String) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn newest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}
