use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Wrist position with its frame timestamp (ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailSample {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl TrailSample {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }
}

/// Fixed-capacity ring of wrist samples; the oldest sample is evicted first.
#[derive(Debug, Clone)]
pub struct WristTrail {
    samples: VecDeque<TrailSample>,
    capacity: usize,
}

impl WristTrail {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: TrailSample) {
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

    /// Chronological view of the trail.
    pub fn as_slice(&mut self) -> &[TrailSample] {
        self.samples.make_contiguous()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
