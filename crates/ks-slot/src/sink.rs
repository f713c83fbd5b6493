//! Presentation boundary
//!
//! The machine pushes every observable moment into a [`StageSink`] and
//! exposes its full state as a [`MachineSnapshot`]. Renderers and audio
//! layers consume these; they never touch game state.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use ks_stage::StageEvent;

use crate::grid::Grid;
use crate::machine::SpinPhase;
use crate::resolver::SpinOutcome;

/// Receives stage events in emission order
pub trait StageSink: Send {
    fn emit(&mut self, event: StageEvent);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StageSink for NullSink {
    fn emit(&mut self, _event: StageEvent) {}
}

/// Writes each stage to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl StageSink for LogSink {
    fn emit(&mut self, event: StageEvent) {
        if event.stage.is_tick() {
            log::trace!("[{:>8.1}ms] {:?}", event.timestamp_ms, event.stage);
        } else {
            log::debug!("[{:>8.1}ms] {:?}", event.timestamp_ms, event.stage);
        }
    }
}

/// Shared in-memory recorder; clones observe the same buffer
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<StageEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.lock().clone()
    }

    /// Drain the buffer
    pub fn take(&self) -> Vec<StageEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Stage type names in order
    pub fn type_names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(StageEvent::type_name).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl StageSink for RecordingSink {
    fn emit(&mut self, event: StageEvent) {
        self.events.lock().push(event);
    }
}

/// Fans events out to several sinks
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn StageSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a sink
    pub fn with(mut self, sink: impl StageSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl StageSink for MultiSink {
    fn emit(&mut self, event: StageEvent) {
        if let Some((last, rest)) = self.sinks.split_last_mut() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}

/// Everything the presentation layer may observe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Current grid (transient while spinning)
    pub grid: Grid,
    pub phase: SpinPhase,
    /// Latest resolved outcome
    pub last_outcome: Option<SpinOutcome>,
    /// Authoritative balance
    pub balance: u64,
    /// Smoothed balance for display
    pub display_balance: u64,
    pub bet: u64,
    pub combo: u32,
    pub free_spins: u32,
    pub bonus_active: bool,
    pub bonus_spins_left: u32,
    pub bet_cycle_allowed: bool,
}

impl MachineSnapshot {
    /// Input surface should accept a spin
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, SpinPhase::Idle)
    }
}
