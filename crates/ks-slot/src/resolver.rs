//! Outcome resolver
//!
//! Turns a settled grid plus the current bonus state into a [`SpinOutcome`]
//! and a [`BonusDelta`]. Forced outcomes (consolation lines, the bonus
//! super jackpot) rewrite the grid, so the resolver hands back the grid the
//! player should see.
//!
//! Base mode: natural scan, then a consolation roll when nothing matched.
//! Bonus mode: super jackpot roll, then a bonus consolation roll, then a
//! natural scan with no consolation fallback. Every bonus resolution
//! consumes one bonus spin.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use ks_stage::WinTier;

use crate::bonus::{BonusDelta, BonusMode};
use crate::config::{GridSpec, OddsConfig, SlotConfig};
use crate::grid::Grid;
use crate::paytable::{PayTable, Payline};
use crate::rng::RandomSource;
use crate::symbols::Symbol;

/// How a line win came about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinOrigin {
    /// Three equal symbols drawn on a payline
    Natural,
    /// Payline overwritten with the consolation symbol
    Consolation,
}

/// Result of resolving one settled grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpinOutcome {
    NoWin,
    LineWin {
        symbol: Symbol,
        line: Payline,
        tier: WinTier,
        origin: WinOrigin,
    },
    /// Whole grid forced to the jackpot symbol; no single line
    SuperJackpot { symbol: Symbol },
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        !matches!(self, Self::NoWin)
    }

    /// Winning symbol
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Self::NoWin => None,
            Self::LineWin { symbol, .. } | Self::SuperJackpot { symbol } => Some(*symbol),
        }
    }

    /// Matched payline (`None` for the whole-grid super jackpot)
    pub fn line(&self) -> Option<&Payline> {
        match self {
            Self::LineWin { line, .. } => Some(line),
            _ => None,
        }
    }

    pub fn tier(&self) -> Option<WinTier> {
        match self {
            Self::NoWin => None,
            Self::LineWin { tier, .. } => Some(*tier),
            Self::SuperJackpot { .. } => Some(WinTier::SuperJackpot),
        }
    }
}

/// Resolver output: the grid to show, the outcome and the bonus change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub grid: Grid,
    pub outcome: SpinOutcome,
    pub bonus: BonusDelta,
}

/// Outcome resolver
#[derive(Debug, Clone)]
pub struct OutcomeResolver {
    paytable: PayTable,
    odds: OddsConfig,
    grid: GridSpec,
    bonus_spins: NonZeroU32,
}

impl OutcomeResolver {
    pub fn new(paytable: PayTable, odds: OddsConfig, grid: GridSpec, bonus_spins: u32) -> Self {
        Self {
            paytable,
            odds,
            grid,
            bonus_spins: NonZeroU32::new(bonus_spins).unwrap_or(NonZeroU32::MIN),
        }
    }

    pub fn from_config(config: &SlotConfig) -> Self {
        Self::new(
            PayTable::from_config(&config.paytable),
            config.odds.clone(),
            config.grid,
            config.rewards.bonus_spins,
        )
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    /// Resolve a settled grid
    pub fn resolve(&self, grid: Grid, bonus: BonusMode, rng: &mut dyn RandomSource) -> Resolution {
        let resolution = if bonus.is_active() {
            self.resolve_bonus(grid, bonus, rng)
        } else {
            self.resolve_base(grid, rng)
        };

        match &resolution.outcome {
            SpinOutcome::SuperJackpot { symbol } => {
                log::info!("Super jackpot: grid filled with {symbol}");
            }
            SpinOutcome::LineWin {
                symbol,
                line,
                origin,
                ..
            } => {
                log::debug!("Line win: {symbol} on line {} ({origin:?})", line.index);
            }
            SpinOutcome::NoWin => log::debug!("No win"),
        }
        resolution
    }

    fn resolve_base(&self, grid: Grid, rng: &mut dyn RandomSource) -> Resolution {
        let (grid, outcome) = match self.natural(&grid) {
            Some(outcome) => (grid, outcome),
            None if rng.chance(self.odds.consolation_chance) => self.consolation(&grid, rng),
            None => (grid, SpinOutcome::NoWin),
        };

        let bonus = match outcome.symbol() {
            Some(symbol) if symbol == self.paytable.bonus_trigger_symbol => BonusDelta::Enter {
                spins: self.bonus_spins,
            },
            _ => BonusDelta::None,
        };

        Resolution {
            grid,
            outcome,
            bonus,
        }
    }

    fn resolve_bonus(
        &self,
        grid: Grid,
        bonus: BonusMode,
        rng: &mut dyn RandomSource,
    ) -> Resolution {
        let (grid, outcome) = if rng.chance(self.odds.super_jackpot_chance) {
            let symbol = self.paytable.jackpot_symbol;
            (
                Grid::filled(self.grid, symbol),
                SpinOutcome::SuperJackpot { symbol },
            )
        } else if rng.chance(self.odds.bonus_consolation_chance) {
            self.consolation(&grid, rng)
        } else {
            let outcome = self.natural(&grid).unwrap_or(SpinOutcome::NoWin);
            (grid, outcome)
        };

        Resolution {
            grid,
            outcome,
            bonus: bonus.step(),
        }
    }

    /// First natural payline match
    fn natural(&self, grid: &Grid) -> Option<SpinOutcome> {
        self.paytable.scan(grid).map(|hit| SpinOutcome::LineWin {
            symbol: hit.symbol,
            line: *hit.line,
            tier: self.tier_of(hit.symbol),
            origin: WinOrigin::Natural,
        })
    }

    /// Overwrite a uniformly chosen payline with the consolation symbol
    fn consolation(&self, grid: &Grid, rng: &mut dyn RandomSource) -> (Grid, SpinOutcome) {
        let lines = &self.paytable.paylines;
        let Some(line) = lines.get(rng.index(lines.len())) else {
            return (grid.clone(), SpinOutcome::NoWin);
        };
        let symbol = self.paytable.consolation_symbol;
        (
            grid.with_line(line, symbol),
            SpinOutcome::LineWin {
                symbol,
                line: *line,
                tier: self.tier_of(symbol),
                origin: WinOrigin::Consolation,
            },
        )
    }

    fn tier_of(&self, symbol: Symbol) -> WinTier {
        if symbol == self.paytable.jackpot_symbol {
            WinTier::Jackpot
        } else {
            WinTier::Normal
        }
    }
}

impl Default for OutcomeResolver {
    fn default() -> Self {
        Self::from_config(&SlotConfig::default())
    }
}
