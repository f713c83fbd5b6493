//! Session statistics

use serde::{Deserialize, Serialize};

use ks_stage::WinTier;

use crate::bonus::BonusDelta;
use crate::machine::SpinReport;
use crate::resolver::{SpinOutcome, WinOrigin};

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub paid_spins: u64,
    pub free_spins: u64,
    /// Coins debited for paid spins
    pub total_wagered: u64,
    /// Coins credited by wins
    pub total_credited: u64,
    pub wins: u64,
    pub losses: u64,
    /// Line wins on the jackpot symbol
    pub jackpots: u64,
    pub super_jackpots: u64,
    /// Forced consolation lines
    pub consolation_wins: u64,
    pub bonus_entries: u64,
    /// Spins resolved under bonus rules
    pub bonus_spins: u64,
    pub free_spins_awarded: u64,
    pub longest_combo: u32,
    /// Largest single credit
    pub max_credit: u64,
}

impl SessionStats {
    /// Fold one resolved spin into the totals
    pub fn record(&mut self, report: &SpinReport) {
        let settlement = &report.settlement;
        self.total_spins += 1;
        if settlement.ticket.free_spin {
            self.free_spins += 1;
        } else {
            self.paid_spins += 1;
        }
        self.total_wagered = self.total_wagered.saturating_add(settlement.ticket.debit);
        self.total_credited = self.total_credited.saturating_add(settlement.credit);
        self.max_credit = self.max_credit.max(settlement.credit);

        match &report.outcome {
            SpinOutcome::NoWin => self.losses += 1,
            SpinOutcome::SuperJackpot { .. } => {
                self.wins += 1;
                self.super_jackpots += 1;
            }
            SpinOutcome::LineWin { tier, origin, .. } => {
                self.wins += 1;
                if *tier == WinTier::Jackpot {
                    self.jackpots += 1;
                }
                if *origin == WinOrigin::Consolation {
                    self.consolation_wins += 1;
                }
            }
        }

        match settlement.bonus {
            BonusDelta::Enter { .. } => self.bonus_entries += 1,
            delta if delta.consumed_spin() => self.bonus_spins += 1,
            _ => {}
        }
        if settlement.free_spin_awarded {
            self.free_spins_awarded += 1;
        }
        self.longest_combo = self.longest_combo.max(settlement.combo);
    }

    /// Return to player, percent of coins wagered
    pub fn rtp(&self) -> f64 {
        if self.total_wagered > 0 {
            (self.total_credited as f64 / self.total_wagered as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Winning spins, percent of all spins
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Net coins for the player (credited minus wagered)
    pub fn net(&self) -> i128 {
        self.total_credited as i128 - self.total_wagered as i128
    }
}
