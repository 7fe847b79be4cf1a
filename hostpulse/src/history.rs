//! Small utilities to manage bounded history buffers for charts.

use std::collections::VecDeque;

pub const CPU_WINDOW: usize = 10;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if cap == 0 {
        return;
    }
    while dq.len() >= cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// Fixed-capacity FIFO of recent samples, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingWindow {
    samples: VecDeque<f64>,
    cap: usize,
}

impl TrailingWindow {
    pub fn new(cap: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, v: f64) {
        push_capped(&mut self.samples, v, self.cap);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Samples as sparkline bars (0..=100).
    pub fn as_bars(&self) -> Vec<u64> {
        self.values().map(|v| v.clamp(0.0, 100.0).round() as u64).collect()
    }
}

impl Default for TrailingWindow {
    fn default() -> Self {
        Self::new(CPU_WINDOW)
    }
}
