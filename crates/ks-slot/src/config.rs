//! Slot engine configuration
//!
//! Every probability and reward constant the resolver and ledger use lives
//! here as a named field. The defaults reproduce the reference machine and
//! are tuning choices pending game-design review.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::symbols::{Symbol, SymbolPay, standard_pays};
use crate::timing::TimingConfig;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(&'static str),

    #[error("Invalid bets: {0}")]
    InvalidBets(&'static str),

    #[error("Probability {name} out of range: {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Invalid reward: {0}")]
    InvalidReward(&'static str),

    #[error("Invalid paytable: {0}")]
    InvalidPaytable(String),

    #[error("Invalid timing: {0}")]
    InvalidTiming(&'static str),
}

/// Grid specification (columns × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub columns: u8,
    /// Number of visible rows per reel
    pub rows: u8,
}

impl GridSpec {
    /// Reference 3×3 grid
    pub fn standard_3x3() -> Self {
        Self {
            columns: 3,
            rows: 3,
        }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_3x3()
    }
}

/// Symbol payouts and the symbols with special roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaytableConfig {
    /// Per-symbol multipliers; a missing symbol pays 1×
    pub symbols: Vec<SymbolPay>,
    /// Forced low-tier win symbol
    pub consolation_symbol: Symbol,
    /// Line win that enters bonus mode
    pub bonus_trigger_symbol: Symbol,
    /// Line win that grants one free spin
    pub free_spin_symbol: Symbol,
    /// Jackpot tier symbol; fills the grid on a super jackpot
    pub jackpot_symbol: Symbol,
    /// Include one vertical line per column
    pub vertical_lines: bool,
}

impl Default for PaytableConfig {
    fn default() -> Self {
        Self {
            symbols: standard_pays(),
            consolation_symbol: Symbol::Cherry,
            bonus_trigger_symbol: Symbol::Diamond,
            free_spin_symbol: Symbol::Cherry,
            jackpot_symbol: Symbol::Seven,
            vertical_lines: true,
        }
    }
}

/// Outcome probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OddsConfig {
    /// Base mode: forced consolation line when nothing matched naturally
    pub consolation_chance: f64,
    /// Bonus mode: whole grid forced to the jackpot symbol
    pub super_jackpot_chance: f64,
    /// Bonus mode: forced consolation line, checked after the super jackpot roll
    pub bonus_consolation_chance: f64,
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            consolation_chance: 0.2,
            super_jackpot_chance: 0.05,
            bonus_consolation_chance: 2.0 / 3.0,
        }
    }
}

/// Reward constants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Super jackpot credit = bet × jackpot multiplier × factor
    pub super_jackpot_factor: u32,
    /// Spins allotted when bonus mode is entered
    pub bonus_spins: u32,
    /// Highest combo multiplier
    pub combo_cap: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            super_jackpot_factor: 50,
            bonus_spins: 10,
            combo_cap: 5,
        }
    }
}

/// Bet denominations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetConfig {
    /// Ordered denominations, cycled with wrap-around
    pub levels: Vec<u64>,
    /// Bet selected at session start
    pub default_bet: u64,
}

impl Default for BetConfig {
    fn default() -> Self {
        Self {
            levels: vec![10, 50, 100, 200, 500, 1000, 10_000, 100_000],
            default_bet: 50,
        }
    }
}

impl BetConfig {
    /// Position of a bet in the denomination list
    pub fn index_of(&self, bet: u64) -> Option<usize> {
        self.levels.iter().position(|&level| level == bet)
    }

    /// Next denomination after `bet`, wrapping; unknown bets restart the list
    pub fn next_after(&self, bet: u64) -> Option<u64> {
        if self.levels.is_empty() {
            return None;
        }
        let next = match self.index_of(bet) {
            Some(idx) => (idx + 1) % self.levels.len(),
            None => 0,
        };
        Some(self.levels[next])
    }
}

/// Free-spin handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeSpinConfig {
    /// Refuse paid spins while free-spin credit is waiting
    pub paid_spins_blocked_by_credit: bool,
    /// Start the next free spin automatically after a spin resolves
    pub auto_continue: bool,
    /// Delay before an automatic free spin (ms)
    pub auto_continue_delay_ms: u64,
}

impl Default for FreeSpinConfig {
    fn default() -> Self {
        Self {
            paid_spins_blocked_by_credit: true,
            auto_continue: false,
            auto_continue_delay_ms: 500,
        }
    }
}

/// Complete slot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Machine name (used as the trace game ID)
    pub name: String,
    /// Grid layout
    pub grid: GridSpec,
    /// Symbols drawn uniformly for every cell
    pub reel_symbols: Vec<Symbol>,
    /// Payouts and symbol roles
    pub paytable: PaytableConfig,
    /// Outcome probabilities
    pub odds: OddsConfig,
    /// Reward constants
    pub rewards: RewardConfig,
    /// Bet denominations
    pub bets: BetConfig,
    /// Balance at session start
    pub starting_balance: u64,
    /// Free-spin handling
    pub free_spins: FreeSpinConfig,
    /// Animation timing
    pub timing: TimingConfig,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            name: "kakuhen".to_string(),
            grid: GridSpec::default(),
            reel_symbols: Symbol::ALL.to_vec(),
            paytable: PaytableConfig::default(),
            odds: OddsConfig::default(),
            rewards: RewardConfig::default(),
            bets: BetConfig::default(),
            starting_balance: 1000,
            free_spins: FreeSpinConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl SlotConfig {
    /// Reference machine with instant timing (batch runs, tests)
    pub fn studio() -> Self {
        Self {
            timing: TimingConfig::studio(),
            ..Self::default()
        }
    }

    /// Builder: replace timing
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Parse and validate JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let config = match ext.as_str() {
            "json" => Self::from_json(&text)?,
            "yaml" | "yml" => Self::from_yaml(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        log::info!(
            "Loaded slot config '{}' from {}",
            config.name,
            path.display()
        );
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Check structural constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid != GridSpec::standard_3x3() {
            return Err(ConfigError::InvalidGrid("paylines require a 3×3 grid"));
        }
        if self.reel_symbols.is_empty() {
            return Err(ConfigError::InvalidGrid("reel symbol set is empty"));
        }

        if self.bets.levels.is_empty() {
            return Err(ConfigError::InvalidBets("denomination list is empty"));
        }
        if self.bets.levels.contains(&0) {
            return Err(ConfigError::InvalidBets("denominations must be positive"));
        }
        if self.bets.levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::InvalidBets(
                "denominations must be strictly increasing",
            ));
        }
        if self.bets.index_of(self.bets.default_bet).is_none() {
            return Err(ConfigError::InvalidBets("default bet is not a denomination"));
        }

        for (name, value) in [
            ("consolation_chance", self.odds.consolation_chance),
            ("super_jackpot_chance", self.odds.super_jackpot_chance),
            ("bonus_consolation_chance", self.odds.bonus_consolation_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        if self.rewards.bonus_spins == 0 {
            return Err(ConfigError::InvalidReward("bonus allotment must be positive"));
        }
        if self.rewards.combo_cap == 0 {
            return Err(ConfigError::InvalidReward("combo cap must be positive"));
        }
        if self.rewards.super_jackpot_factor == 0 {
            return Err(ConfigError::InvalidReward(
                "super jackpot factor must be positive",
            ));
        }

        for pay in &self.paytable.symbols {
            if !pay.multiplier.is_valid() {
                return Err(ConfigError::InvalidPaytable(format!(
                    "{} has a non-positive multiplier",
                    pay.symbol
                )));
            }
        }

        if self.timing.spin_frames == 0 {
            return Err(ConfigError::InvalidTiming("spin needs at least one frame"));
        }

        Ok(())
    }
}
