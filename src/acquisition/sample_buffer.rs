// src/acquisition/sample_buffer.rs
//! Bounded FIFO sample buffer for one channel

use crate::error::{SignalErrorBuilder, SignalResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::trace;

/// Treatment of non-finite samples on push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NanPolicy {
    /// Drop NaN/Infinity before it reaches the buffer
    Strict,
    /// Store everything; consumers filter at aggregation time
    Lenient,
}

/// Fixed-capacity sliding window of samples.
///
/// Pushing beyond capacity evicts exactly one sample from the front, so the
/// buffer always holds the most recent `capacity` accepted samples in arrival
/// order.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
    policy: NanPolicy,
    dropped: u64,
}

impl SampleBuffer {
    /// Create an empty buffer holding at most `capacity` samples
    pub fn new(capacity: usize, policy: NanPolicy) -> SignalResult<Self> {
        if capacity == 0 {
            return Err(SignalErrorBuilder::new("sample_buffer").configuration("capacity must be greater than 0"));
        }

        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            policy,
            dropped: 0,
        })
    }

    /// Append a sample, evicting the oldest when full.
    ///
    /// Returns `false` when strict mode rejected a non-finite value.
    pub fn push(&mut self, value: f64) -> bool {
        if self.policy == NanPolicy::Strict && !value.is_finite() {
            self.dropped += 1;
            trace!(value, dropped = self.dropped, "dropping non-finite sample");
            return false;
        }

        self.samples.push_back(value);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        true
    }

    /// Append every value in order
    pub fn extend<I: IntoIterator<Item = f64>>(&mut self, values: I) {
        for value in values {
            self.push(value);
        }
    }

    /// Copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Iterate over the current contents, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.samples.iter()
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> NanPolicy {
        self.policy
    }

    /// Samples rejected by strict mode since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Current fill level (0.0 to 1.0)
    pub fn utilization(&self) -> f32 {
        self.samples.len() as f32 / self.capacity as f32
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
