// Fixed-capacity chart series (FIFO eviction)

use std::collections::VecDeque;

use crate::models::Sample;

/// Chronologically ordered samples, oldest at the head.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::with_capacity(super::SERIES_CAPACITY)
    }
}

impl SeriesBuffer {
    /// Capacity is clamped to at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push to the tail; drops from the head once length exceeds capacity.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }
}
