//! StageEvent — A stage occurrence with metadata
//!
//! Wraps a Stage with timing and payload information.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;
use crate::taxonomy::WinLine;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The stage
    pub stage: Stage,

    /// Timestamp in milliseconds on the session clock
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,

    /// Custom tags for filtering/routing
    #[serde(default)]
    pub tags: Vec<String>,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
            tags: Vec::new(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
            tags: Vec::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    // ═══ WIN DATA ═══
    /// Credited amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<u64>,

    /// Bet amount (for ratio calculations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_amount: Option<u64>,

    /// Line to highlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_line: Option<WinLine>,

    /// Whole grid is the win (no single line highlighted)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub whole_grid: bool,

    // ═══ SESSION STATE ═══
    /// Authoritative balance after this stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,

    /// Bonus spins remaining
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spins_remaining: Option<u32>,

    /// Combo multiplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,

    /// Spin ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_id: Option<String>,
}

impl StagePayload {
    /// Create empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with win data
    pub fn with_win(win_amount: u64, bet_amount: Option<u64>) -> Self {
        Self {
            win_amount: Some(win_amount),
            bet_amount,
            ..Default::default()
        }
    }

    /// Builder: set bet amount
    pub fn bet_amount(mut self, amount: u64) -> Self {
        self.bet_amount = Some(amount);
        self
    }

    /// Builder: set highlighted line
    pub fn win_line(mut self, line: WinLine) -> Self {
        self.win_line = Some(line);
        self.whole_grid = false;
        self
    }

    /// Builder: mark the whole grid as the win
    pub fn whole_grid(mut self) -> Self {
        self.win_line = None;
        self.whole_grid = true;
        self
    }

    /// Builder: set balance
    pub fn balance(mut self, balance: u64) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Builder: set spins remaining
    pub fn spins_remaining(mut self, spins: u32) -> Self {
        self.spins_remaining = Some(spins);
        self
    }

    /// Builder: set multiplier
    pub fn multiplier(mut self, mult: u32) -> Self {
        self.multiplier = Some(mult);
        self
    }

    /// Builder: set spin ID
    pub fn spin_id(mut self, id: impl Into<String>) -> Self {
        self.spin_id = Some(id.into());
        self
    }

    /// Calculate win ratio if both amounts are present
    pub fn calculate_ratio(&self) -> Option<f64> {
        match (self.win_amount, self.bet_amount) {
            (Some(win), Some(bet)) if bet > 0 => Some(win as f64 / bet as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{CellPosition, WinTier};

    #[test]
    fn test_stage_event_creation() {
        let event = StageEvent::new(Stage::EvaluateWins, 1500.0).with_tag("settled");

        assert_eq!(event.stage, Stage::EvaluateWins);
        assert_eq!(event.timestamp_ms, 1500.0);
        assert!(event.tags.contains(&"settled".to_string()));
        assert_eq!(event.type_name(), "evaluate_wins");
    }

    #[test]
    fn test_payload_win_ratio() {
        let payload = StagePayload::with_win(60, Some(50));
        assert_eq!(payload.calculate_ratio(), Some(1.2));
        assert_eq!(StagePayload::new().calculate_ratio(), None);
    }

    #[test]
    fn test_whole_grid_clears_line() {
        let line = WinLine {
            line_index: 1,
            positions: vec![CellPosition::new(0, 1), CellPosition::new(1, 1), CellPosition::new(2, 1)],
            symbol_id: 1,
            symbol_name: Some("cherry".into()),
        };
        let payload = StagePayload::new().win_line(line).whole_grid();
        assert!(payload.win_line.is_none());
        assert!(payload.whole_grid);
    }

    #[test]
    fn test_payload_serialization() {
        let event = StageEvent::with_payload(
            Stage::WinPresent {
                tier: WinTier::Normal,
                symbol_id: 1,
                line_index: Some(1),
                win_amount: 60,
            },
            0.0,
            StagePayload::with_win(60, Some(50)).multiplier(1),
        );

        let json = serde_json::to_string(&event.payload).unwrap();
        assert!(json.contains("win_amount"));
        assert!(json.contains("multiplier"));

        // Empty fields should be skipped
        assert!(!json.contains("spin_id"));
        assert!(!json.contains("whole_grid"));
    }
}
