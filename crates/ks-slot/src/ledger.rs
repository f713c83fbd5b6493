//! Session ledger
//!
//! Owns the authoritative balance, bet, combo streak, free-spin credit and
//! bonus state. A spin goes through two steps:
//!
//! 1. [`SessionLedger::begin_spin`] at acceptance: debits the bet, or
//!    consumes exactly one free-spin credit.
//! 2. [`SessionLedger::settle`] at resolution: credits the win, updates the
//!    combo streak and free-spin credit and applies the bonus delta.
//!
//! [`SessionLedger::apply_spin`] runs both at once.

use serde::{Deserialize, Serialize};

use crate::bonus::{BonusDelta, BonusMode};
use crate::config::{BetConfig, FreeSpinConfig, RewardConfig, SlotConfig};
use crate::error::{BetRejection, SpinRejection};
use crate::paytable::PayTable;
use crate::resolver::SpinOutcome;

/// Authoritative session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Coin balance (never negative)
    pub balance: u64,
    /// Current bet denomination
    pub bet: u64,
    /// Consecutive winning spins
    pub combo: u32,
    /// Free-spin credit
    pub free_spins: u32,
    /// Bonus mode flag and countdown
    pub bonus: BonusMode,
}

impl SessionState {
    /// Bet cycling is locked during bonus mode
    pub fn bet_cycle_allowed(&self) -> bool {
        !self.bonus.is_active()
    }
}

/// Proof that a spin was paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinTicket {
    /// Paid from free-spin credit
    pub free_spin: bool,
    /// Bet at acceptance
    pub bet: u64,
    /// Coins taken from the balance
    pub debit: u64,
}

/// Everything a settled spin changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub ticket: SpinTicket,
    /// Coins credited
    pub credit: u64,
    /// Combo streak after this spin
    pub combo: u32,
    /// Combo multiplier applied to the credit (`None` when no combo applied)
    pub combo_multiplier: Option<u32>,
    /// One free spin was granted
    pub free_spin_awarded: bool,
    /// Bonus change applied
    pub bonus: BonusDelta,
    /// State after settlement
    pub state: SessionState,
}

/// Session ledger
#[derive(Debug, Clone)]
pub struct SessionLedger {
    state: SessionState,
    paytable: PayTable,
    rewards: RewardConfig,
    bets: BetConfig,
    free_spins: FreeSpinConfig,
}

impl SessionLedger {
    pub fn from_config(config: &SlotConfig) -> Self {
        Self {
            state: SessionState {
                balance: config.starting_balance,
                bet: config.bets.default_bet,
                combo: 0,
                free_spins: 0,
                bonus: BonusMode::Inactive,
            },
            paytable: PayTable::from_config(&config.paytable),
            rewards: config.rewards.clone(),
            bets: config.bets.clone(),
            free_spins: config.free_spins.clone(),
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Replace the state (scenario setup, restoring a snapshot)
    pub fn with_state(mut self, state: SessionState) -> Self {
        self.state = state;
        self
    }

    /// Check a spin could be accepted, without changing anything
    pub fn check_spin(&self, free_spin: bool) -> Result<(), SpinRejection> {
        let state = &self.state;
        if free_spin {
            if state.free_spins == 0 {
                return Err(SpinRejection::NoFreeSpins);
            }
            return Ok(());
        }
        if self.free_spins.paid_spins_blocked_by_credit && state.free_spins > 0 {
            return Err(SpinRejection::FreeSpinsPending {
                credit: state.free_spins,
            });
        }
        if state.balance < state.bet {
            return Err(SpinRejection::InsufficientBalance {
                balance: state.balance,
                bet: state.bet,
            });
        }
        Ok(())
    }

    /// Accept a spin: debit the bet, or consume one free-spin credit
    pub fn begin_spin(&mut self, free_spin: bool) -> Result<SpinTicket, SpinRejection> {
        self.check_spin(free_spin)?;
        let bet = self.state.bet;
        let ticket = if free_spin {
            self.state.free_spins -= 1;
            SpinTicket {
                free_spin,
                bet,
                debit: 0,
            }
        } else {
            let debit = bet.min(self.state.balance);
            self.state.balance -= debit;
            SpinTicket {
                free_spin,
                bet,
                debit,
            }
        };
        log::debug!(
            "Spin accepted (free: {}, bet: {}, balance: {}, free spins: {})",
            ticket.free_spin,
            bet,
            self.state.balance,
            self.state.free_spins
        );
        Ok(ticket)
    }

    /// Apply a resolved outcome
    pub fn settle(
        &mut self,
        ticket: SpinTicket,
        outcome: &SpinOutcome,
        bonus: BonusDelta,
    ) -> Settlement {
        let bet = ticket.bet;
        let mut combo_multiplier = None;
        let mut free_spin_awarded = false;

        let credit = match outcome {
            SpinOutcome::NoWin => {
                self.state.combo = 0;
                0
            }
            SpinOutcome::SuperJackpot { symbol } => {
                self.state.combo = 0;
                self.paytable
                    .multiplier(*symbol)
                    .apply(bet.saturating_mul(self.rewards.super_jackpot_factor as u64))
            }
            SpinOutcome::LineWin { symbol, .. } => {
                self.state.combo = self.state.combo.saturating_add(1);
                let multiplier = self.state.combo.min(self.rewards.combo_cap);
                combo_multiplier = Some(multiplier);
                if *symbol == self.paytable.free_spin_symbol {
                    self.state.free_spins = self.state.free_spins.saturating_add(1);
                    free_spin_awarded = true;
                }
                self.paytable
                    .multiplier(*symbol)
                    .apply(bet.saturating_mul(multiplier as u64))
            }
        };

        self.state.balance = self.state.balance.saturating_add(credit);

        let was_active = self.state.bonus.is_active();
        self.state.bonus = self.state.bonus.apply(bonus);
        match (was_active, self.state.bonus.is_active()) {
            (false, true) => log::info!(
                "Bonus mode entered ({} spins)",
                self.state.bonus.spins_left()
            ),
            (true, false) => log::info!("Bonus mode ended"),
            _ => {}
        }

        Settlement {
            ticket,
            credit,
            combo: self.state.combo,
            combo_multiplier,
            free_spin_awarded,
            bonus,
            state: self.state,
        }
    }

    /// Debit and settle in one step
    pub fn apply_spin(
        &mut self,
        outcome: &SpinOutcome,
        bonus: BonusDelta,
        free_spin: bool,
    ) -> Result<Settlement, SpinRejection> {
        let ticket = self.begin_spin(free_spin)?;
        Ok(self.settle(ticket, outcome, bonus))
    }

    /// Advance to the next bet denomination, wrapping
    pub fn cycle_bet(&mut self) -> Result<u64, BetRejection> {
        if !self.state.bet_cycle_allowed() {
            return Err(BetRejection::BonusModeActive);
        }
        if let Some(next) = self.bets.next_after(self.state.bet) {
            self.state.bet = next;
        }
        Ok(self.state.bet)
    }
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::from_config(&SlotConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::paytable::standard_paylines;
    use crate::resolver::WinOrigin;
    use crate::symbols::Symbol;
    use ks_stage::WinTier;

    fn line_win(symbol: Symbol) -> SpinOutcome {
        SpinOutcome::LineWin {
            symbol,
            line: standard_paylines(true)[0],
            tier: if symbol == Symbol::Seven {
                WinTier::Jackpot
            } else {
                WinTier::Normal
            },
            origin: WinOrigin::Natural,
        }
    }

    #[test]
    fn test_cherry_win_scenario() {
        let mut ledger = SessionLedger::default();
        let s = ledger
            .apply_spin(&line_win(Symbol::Cherry), BonusDelta::None, false)
            .unwrap();
        assert_eq!(s.credit, 60);
        assert_eq!(s.state.balance, 1010);
        assert_eq!(s.state.combo, 1);
        assert_eq!(s.state.free_spins, 1);
        assert!(s.free_spin_awarded);
        assert_eq!(s.combo_multiplier, Some(1));
    }

    #[test]
    fn test_combo_multiplier_caps() {
        let mut ledger = SessionLedger::default().with_state(SessionState {
            balance: 10_000,
            bet: 10,
            combo: 0,
            free_spins: 0,
            bonus: BonusMode::Inactive,
        });
        let mut credits = vec![];
        for _ in 0..7 {
            let s = ledger
                .apply_spin(&line_win(Symbol::Lemon), BonusDelta::None, false)
                .unwrap();
            credits.push(s.credit);
        }
        assert_eq!(credits, vec![20, 40, 60, 80, 100, 100, 100]);
        assert_eq!(ledger.state().combo, 7);

        ledger
            .apply_spin(&SpinOutcome::NoWin, BonusDelta::None, false)
            .unwrap();
        assert_eq!(ledger.state().combo, 0);
    }

    #[test]
    fn test_super_jackpot_credit() {
        let mut ledger = SessionLedger::default().with_state(SessionState {
            balance: 1000,
            bet: 50,
            combo: 3,
            free_spins: 0,
            bonus: BonusMode::active(10).unwrap(),
        });
        let s = ledger
            .apply_spin(
                &SpinOutcome::SuperJackpot {
                    symbol: Symbol::Seven,
                },
                BonusDelta::Continue {
                    spins_left: NonZeroU32::new(9).unwrap(),
                },
                false,
            )
            .unwrap();
        assert_eq!(s.credit, 50 * 100 * 50);
        assert_eq!(s.state.balance, 1000 - 50 + 250_000);
        assert_eq!(s.state.combo, 0);
        assert_eq!(s.combo_multiplier, None);
        assert_eq!(s.state.bonus.spins_left(), 9);
    }

    #[test]
    fn test_insufficient_balance_leaves_state() {
        let mut ledger = SessionLedger::default().with_state(SessionState {
            balance: 40,
            bet: 50,
            combo: 2,
            free_spins: 0,
            bonus: BonusMode::Inactive,
        });
        let before = *ledger.state();
        assert_eq!(
            ledger.begin_spin(false),
            Err(SpinRejection::InsufficientBalance {
                balance: 40,
                bet: 50
            })
        );
        assert_eq!(*ledger.state(), before);
    }

    #[test]
    fn test_free_spin_consumes_exactly_one() {
        let mut ledger = SessionLedger::default().with_state(SessionState {
            balance: 0,
            bet: 50,
            combo: 0,
            free_spins: 2,
            bonus: BonusMode::Inactive,
        });
        let ticket = ledger.begin_spin(true).unwrap();
        assert_eq!(ticket.debit, 0);
        assert_eq!(ledger.state().free_spins, 1);
        assert_eq!(ledger.state().balance, 0);

        ledger.settle(ticket, &SpinOutcome::NoWin, BonusDelta::None);
        ledger.begin_spin(true).unwrap();
        assert_eq!(ledger.begin_spin(true), Err(SpinRejection::NoFreeSpins));
    }

    #[test]
    fn test_paid_spin_blocked_by_pending_credit() {
        let state = SessionState {
            balance: 1000,
            bet: 50,
            combo: 0,
            free_spins: 1,
            bonus: BonusMode::Inactive,
        };
        let mut ledger = SessionLedger::default().with_state(state);
        assert_eq!(
            ledger.begin_spin(false),
            Err(SpinRejection::FreeSpinsPending { credit: 1 })
        );

        let mut config = SlotConfig::default();
        config.free_spins.paid_spins_blocked_by_credit = false;
        let mut ledger = SessionLedger::from_config(&config).with_state(state);
        assert!(ledger.begin_spin(false).is_ok());
        assert_eq!(ledger.state().free_spins, 1);
    }

    #[test]
    fn test_diamond_enters_bonus_and_locks_bet() {
        let mut ledger = SessionLedger::default();
        let s = ledger
            .apply_spin(
                &line_win(Symbol::Diamond),
                BonusDelta::Enter {
                    spins: NonZeroU32::new(10).unwrap(),
                },
                false,
            )
            .unwrap();
        assert!(s.state.bonus.is_active());
        assert_eq!(s.state.bonus.spins_left(), 10);
        assert_eq!(ledger.cycle_bet(), Err(BetRejection::BonusModeActive));
        assert_eq!(ledger.state().bet, 50);
    }

    #[test]
    fn test_cycle_bet_wraps() {
        let mut ledger = SessionLedger::default();
        let mut seen = vec![];
        for _ in 0..8 {
            seen.push(ledger.cycle_bet().unwrap());
        }
        assert_eq!(seen, vec![100, 200, 500, 1000, 10_000, 100_000, 10, 50]);
    }

    #[test]
    fn test_balance_saturates() {
        let mut ledger = SessionLedger::default().with_state(SessionState {
            balance: u64::MAX - 10,
            bet: 100_000,
            combo: 0,
            free_spins: 0,
            bonus: BonusMode::Inactive,
        });
        let s = ledger
            .apply_spin(&line_win(Symbol::Seven), BonusDelta::None, false)
            .unwrap();
        assert_eq!(s.state.balance, u64::MAX);
    }
}
