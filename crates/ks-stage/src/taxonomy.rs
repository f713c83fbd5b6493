//! Stage Taxonomy — Enums for game elements
//!
//! These enums classify outcomes, rejections and grid positions so the
//! presentation layer can pick highlights, messages and audio cues.

use serde::{Deserialize, Serialize};

/// Win tier classification
///
/// - Normal: any line win on an ordinary symbol
/// - Jackpot: a line of sevens
/// - SuperJackpot: the whole grid forced to sevens during bonus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinTier {
    Normal,
    Jackpot,
    SuperJackpot,
}

impl WinTier {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "WIN",
            Self::Jackpot => "JACKPOT",
            Self::SuperJackpot => "SUPER JACKPOT",
        }
    }

    /// Get tier level (for sorting)
    pub fn level(&self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Jackpot => 2,
            Self::SuperJackpot => 3,
        }
    }

    /// Whether a single payline should be highlighted for this tier
    pub fn highlights_line(&self) -> bool {
        !matches!(self, Self::SuperJackpot)
    }
}

/// Why a user action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Balance below the current bet on a paid spin
    InsufficientBalance,
    /// A spin is already in progress
    AlreadySpinning,
    /// Free spin requested with no credit
    NoFreeSpins,
    /// Paid spin requested while free-spin credit is waiting to be used
    FreeSpinsPending,
    /// Bet change requested while bonus mode is active
    BonusModeActive,
}

impl RejectReason {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::InsufficientBalance => "Not enough coins",
            Self::AlreadySpinning => "Spinning...",
            Self::NoFreeSpins => "No free spins",
            Self::FreeSpinsPending => "Use free spins first",
            Self::BonusModeActive => "Bet locked during bonus",
        }
    }

    /// Races the input surface should already prevent; not shown to the player
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::AlreadySpinning)
    }
}

/// Cell position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    /// Column (reel) index (0-based)
    pub column: u8,
    /// Row index (0-based, 0 = top)
    pub row: u8,
}

impl CellPosition {
    pub fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }
}

/// Win line as presented
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLine {
    /// Payline index in declared priority order
    pub line_index: u8,
    /// Cells that make up the line
    pub positions: Vec<CellPosition>,
    /// Symbol ID that won
    pub symbol_id: u32,
    /// Symbol name (optional)
    pub symbol_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(WinTier::SuperJackpot.level() > WinTier::Jackpot.level());
        assert!(WinTier::Jackpot.level() > WinTier::Normal.level());
    }

    #[test]
    fn test_super_jackpot_has_no_line_highlight() {
        assert!(WinTier::Normal.highlights_line());
        assert!(WinTier::Jackpot.highlights_line());
        assert!(!WinTier::SuperJackpot.highlights_line());
    }

    #[test]
    fn test_reject_reason_serialization() {
        let json = serde_json::to_string(&RejectReason::InsufficientBalance).unwrap();
        assert_eq!(json, "\"insufficient_balance\"");
        assert!(RejectReason::AlreadySpinning.is_silent());
        assert!(!RejectReason::BonusModeActive.is_silent());
    }
}
