//! Display-balance smoothing
//!
//! The displayed balance is derived, never stored: each sample is computed
//! from (start, target, start time, duration). Restarting toward a new
//! target begins from whatever is on screen at that moment, so repeated
//! interruptions cannot accumulate error.

use serde::{Deserialize, Serialize};

/// Linear rollup from a start value to a target value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRollup {
    start: u64,
    target: u64,
    started_at_ms: u64,
    duration_ms: u64,
}

impl BalanceRollup {
    /// Settled at `value`
    pub fn settled(value: u64, duration_ms: u64) -> Self {
        Self {
            start: value,
            target: value,
            started_at_ms: 0,
            duration_ms,
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Time at which the display reaches the target
    pub fn ends_at_ms(&self) -> u64 {
        self.started_at_ms.saturating_add(self.duration_ms)
    }

    /// Fraction of the rollup elapsed at `now_ms`, in [0, 1]
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 || now_ms >= self.ends_at_ms() {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        elapsed as f64 / self.duration_ms as f64
    }

    /// Displayed value at `now_ms`; exactly the target once the rollup ends
    pub fn value_at(&self, now_ms: u64) -> u64 {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.target;
        }
        let start = self.start as f64;
        let value = start + (self.target as f64 - start) * t;
        // f64::round is half away from zero
        value.round().clamp(0.0, u64::MAX as f64) as u64
    }

    /// Display matches the target at `now_ms`
    pub fn is_settled(&self, now_ms: u64) -> bool {
        self.value_at(now_ms) == self.target && self.progress(now_ms) >= 1.0
    }

    /// Restart toward a new target from the value on screen at `now_ms`
    pub fn retarget(&mut self, now_ms: u64, target: u64) {
        self.start = self.value_at(now_ms);
        self.target = target;
        self.started_at_ms = now_ms;
    }
}
