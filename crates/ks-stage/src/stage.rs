//! Stage — The core enum defining all observable spin phases
//!
//! A Stage is NOT an animation, NOT an engine call.
//! A Stage is the SEMANTIC MEANING of a moment in the game flow.

use serde::{Deserialize, Serialize};

use crate::taxonomy::{RejectReason, WinTier};

/// Observable game stage
///
/// Grids are column-major symbol IDs (`grid[column][row]`), 0 = unset cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin accepted, reels start moving
    SpinStart {
        /// Spin paid from free-spin credit
        #[serde(default)]
        free_spin: bool,
        /// Bet at spin start
        bet: u64,
    },

    /// One transient "spinning" frame
    ReelFrame {
        /// Frame number (1-based)
        frame: u32,
        /// Transient grid contents
        grid: Vec<Vec<u32>>,
    },

    /// Reels settled on the final grid
    ReelStop {
        /// Settled grid contents
        grid: Vec<Vec<u32>>,
    },

    /// Settled grid handed to the resolver
    EvaluateWins,

    /// Spin complete, ready for next spin
    SpinEnd,

    // ═══════════════════════════════════════════════════════════════════════
    // OUTCOME
    // ═══════════════════════════════════════════════════════════════════════
    /// Winning outcome
    WinPresent {
        /// Outcome tier
        tier: WinTier,
        /// Winning symbol ID (seven for super jackpot)
        symbol_id: u32,
        /// Matched payline, `None` when the whole grid is the win
        #[serde(default)]
        line_index: Option<u8>,
        /// Credited amount
        #[serde(default)]
        win_amount: u64,
    },

    /// Losing outcome
    NoWin,

    /// Combo streak after this spin
    ComboUpdate {
        /// Consecutive wins
        streak: u32,
        /// Multiplier applied to this spin's credit
        #[serde(default)]
        multiplier: u32,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // FEATURES
    // ═══════════════════════════════════════════════════════════════════════
    /// Free-spin credit granted
    FreeSpinAwarded {
        /// Credit after award
        credit: u32,
    },

    /// Bonus mode entered
    BonusEnter {
        /// Spins allotted
        spins: u32,
    },

    /// One bonus-mode spin consumed
    BonusStep {
        /// Spins still to be played under bonus rules
        spins_remaining: u32,
    },

    /// Bonus mode ended
    BonusExit,

    // ═══════════════════════════════════════════════════════════════════════
    // BALANCE
    // ═══════════════════════════════════════════════════════════════════════
    /// Displayed balance starts moving toward a new target
    RollupStart {
        /// Displayed value when the rollup began
        start_amount: u64,
        /// Authoritative balance
        target_amount: u64,
    },

    /// Displayed balance sample
    RollupTick {
        /// Displayed value
        current_amount: u64,
        /// Progress (0.0 - 1.0)
        progress: f64,
    },

    /// Displayed balance reached the authoritative balance
    RollupEnd {
        /// Final displayed value
        final_amount: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // INPUT
    // ═══════════════════════════════════════════════════════════════════════
    /// Bet denomination changed
    BetChanged {
        /// New bet
        bet: u64,
    },

    /// User action refused
    ActionRejected {
        /// Reason shown to the player
        reason: RejectReason,
    },
}

impl Stage {
    /// Get the stage category for grouping
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart { .. }
            | Stage::ReelFrame { .. }
            | Stage::ReelStop { .. }
            | Stage::EvaluateWins
            | Stage::SpinEnd => StageCategory::SpinLifecycle,

            Stage::WinPresent { .. } | Stage::NoWin | Stage::ComboUpdate { .. } => {
                StageCategory::Outcome
            }

            Stage::FreeSpinAwarded { .. }
            | Stage::BonusEnter { .. }
            | Stage::BonusStep { .. }
            | Stage::BonusExit => StageCategory::Feature,

            Stage::RollupStart { .. } | Stage::RollupTick { .. } | Stage::RollupEnd { .. } => {
                StageCategory::Balance
            }

            Stage::BetChanged { .. } | Stage::ActionRejected { .. } => StageCategory::Input,
        }
    }

    /// Get a simple string name for this stage type
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart { .. } => "spin_start",
            Stage::ReelFrame { .. } => "reel_frame",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::SpinEnd => "spin_end",
            Stage::WinPresent { .. } => "win_present",
            Stage::NoWin => "no_win",
            Stage::ComboUpdate { .. } => "combo_update",
            Stage::FreeSpinAwarded { .. } => "free_spin_awarded",
            Stage::BonusEnter { .. } => "bonus_enter",
            Stage::BonusStep { .. } => "bonus_step",
            Stage::BonusExit => "bonus_exit",
            Stage::RollupStart { .. } => "rollup_start",
            Stage::RollupTick { .. } => "rollup_tick",
            Stage::RollupEnd { .. } => "rollup_end",
            Stage::BetChanged { .. } => "bet_changed",
            Stage::ActionRejected { .. } => "action_rejected",
        }
    }

    /// High-frequency stages (frames, rollup samples)
    pub fn is_tick(&self) -> bool {
        matches!(self, Stage::ReelFrame { .. } | Stage::RollupTick { .. })
    }

    /// Stages that should trigger an audio cue
    pub fn has_audio_cue(&self) -> bool {
        matches!(
            self,
            Stage::SpinStart { .. }
                | Stage::WinPresent { .. }
                | Stage::BonusEnter { .. }
                | Stage::BonusExit
        )
    }
}

/// Stage category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    SpinLifecycle,
    Outcome,
    Feature,
    Balance,
    Input,
}

impl StageCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SpinLifecycle => "Spin Lifecycle",
            Self::Outcome => "Outcome",
            Self::Feature => "Features",
            Self::Balance => "Balance",
            Self::Input => "Input",
        }
    }
}
