//! StageTrace — A sequence of stage events for one spin or session
//!
//! A trace captures the full timeline of play as the presentation layer saw it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};
use crate::taxonomy::WinTier;

/// Trace (de)serialization errors
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A complete trace of stage events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Game identifier (config name)
    pub game_id: String,

    /// Spin ID when the trace covers a single spin
    #[serde(default)]
    pub spin_id: Option<String>,

    /// All events in emission order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded
    pub recorded_at: DateTime<Utc>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(trace_id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            game_id: game_id.into(),
            spin_id: None,
            events: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Add events and return self (builder pattern)
    pub fn with_events(mut self, events: impl IntoIterator<Item = StageEvent>) -> Self {
        self.events.extend(events);
        self
    }

    /// Set spin ID
    pub fn with_spin(mut self, spin_id: impl Into<String>) -> Self {
        self.spin_id = Some(spin_id.into());
        self
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.type_name() == type_name)
            .collect()
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.stage.type_name() == type_name)
    }

    /// Sum of all credited wins
    pub fn total_win(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match &e.stage {
                Stage::WinPresent { win_amount, .. } => *win_amount,
                _ => 0,
            })
            .sum()
    }

    /// Highest win tier in trace
    pub fn max_tier(&self) -> Option<WinTier> {
        self.events
            .iter()
            .filter_map(|e| match &e.stage {
                Stage::WinPresent { tier, .. } => Some(*tier),
                _ => None,
            })
            .max_by_key(|tier| tier.level())
    }

    /// Number of completed spins
    pub fn spin_count(&self) -> usize {
        self.events_by_type("spin_end").len()
    }

    /// Get summary of trace
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            trace_id: self.trace_id.clone(),
            game_id: self.game_id.clone(),
            event_count: self.events.len(),
            spin_count: self.spin_count(),
            duration_ms: self.duration_ms(),
            total_win: self.total_win(),
            max_tier: self.max_tier(),
            entered_bonus: self.has_stage("bonus_enter"),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Summary of a trace for quick overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSummary {
    pub trace_id: String,
    pub game_id: String,
    pub event_count: usize,
    pub spin_count: usize,
    pub duration_ms: f64,
    pub total_win: u64,
    pub max_tier: Option<WinTier>,
    pub entered_bonus: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trace() -> StageTrace {
        StageTrace::new("trace-1", "kakuhen").with_events(vec![
            StageEvent::new(
                Stage::SpinStart {
                    free_spin: false,
                    bet: 50,
                },
                0.0,
            ),
            StageEvent::new(Stage::EvaluateWins, 1500.0),
            StageEvent::new(
                Stage::WinPresent {
                    tier: WinTier::Normal,
                    symbol_id: 1,
                    line_index: Some(0),
                    win_amount: 60,
                },
                1500.0,
            ),
            StageEvent::new(Stage::SpinEnd, 1500.0),
            StageEvent::new(
                Stage::SpinStart {
                    free_spin: true,
                    bet: 50,
                },
                2000.0,
            ),
            StageEvent::new(
                Stage::WinPresent {
                    tier: WinTier::Jackpot,
                    symbol_id: 6,
                    line_index: Some(3),
                    win_amount: 10_000,
                },
                3500.0,
            ),
            StageEvent::new(Stage::SpinEnd, 3500.0),
        ])
    }

    #[test]
    fn test_trace_queries() {
        let trace = sample_trace();
        assert_eq!(trace.duration_ms(), 3500.0);
        assert_eq!(trace.spin_count(), 2);
        assert_eq!(trace.total_win(), 10_060);
        assert_eq!(trace.max_tier(), Some(WinTier::Jackpot));
        assert_eq!(trace.events_by_category(StageCategory::Outcome).len(), 2);
        assert!(!trace.has_stage("bonus_enter"));
    }

    #[test]
    fn test_empty_trace() {
        let trace = StageTrace::new("empty", "kakuhen");
        assert_eq!(trace.duration_ms(), 0.0);
        assert_eq!(trace.max_tier(), None);
        assert_eq!(trace.summary().event_count, 0);
    }

    #[test]
    fn test_json_roundtrip() {
        let trace = sample_trace().with_spin("spin-000001");
        let json = trace.to_json().unwrap();
        let parsed = StageTrace::from_json(&json).unwrap();
        assert_eq!(parsed, trace);
        assert!(StageTrace::from_json("{").is_err());
    }
}
