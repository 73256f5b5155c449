//! Fixed-capacity rolling window
//!
//! Holds the most recent `capacity` observations of a series. Appending past
//! capacity evicts the oldest observation. Indexed access and
//! [`RollingWindow::to_sequence`] are newest-first, which is the order the
//! momentum scores read prices in.

use crate::error::{Result, ScoreError};
use std::collections::VecDeque;

/// Bounded, ordered buffer of the most recent observations
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    buffer: VecDeque<f64>,
    capacity: usize,
    samples: u64,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` observations.
    ///
    /// # Errors
    /// Returns [`ScoreError::InvalidParameter`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ScoreError::InvalidParameter(
                "rolling window capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            samples: 0,
        })
    }

    /// Append the newest observation, evicting the oldest when full.
    pub fn append(&mut self, value: f64) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
        self.samples += 1;
    }

    /// True once at least `capacity` observations have been appended.
    pub const fn is_ready(&self) -> bool {
        self.samples >= self.capacity as u64
    }

    /// Maximum number of observations held.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of observations currently held.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing has been appended since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Total number of appends, including evicted observations.
    pub const fn samples(&self) -> u64 {
        self.samples
    }

    /// Newest observation.
    pub fn latest(&self) -> Option<f64> {
        self.buffer.back().copied()
    }

    /// Observation `index` steps back from the newest (0 = newest).
    pub fn get(&self, index: usize) -> Option<f64> {
        let len = self.buffer.len();
        if index >= len {
            return None;
        }
        self.buffer.get(len - 1 - index).copied()
    }

    /// Iterate newest-first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.buffer.iter().rev().copied()
    }

    /// Window contents, newest-first.
    pub fn to_sequence(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Window contents, oldest-first.
    pub fn to_chronological(&self) -> Vec<f64> {
        self.buffer.iter().copied().collect()
    }

    /// The most recent `n` observations, oldest-first.
    ///
    /// Returns fewer than `n` values when the window holds fewer.
    pub fn most_recent(&self, n: usize) -> Vec<f64> {
        let skip = self.buffer.len().saturating_sub(n);
        self.buffer.iter().skip(skip).copied().collect()
    }

    /// Drop all observations and reset readiness.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.samples = 0;
    }
}
