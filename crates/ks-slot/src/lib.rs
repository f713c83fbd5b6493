//! # ks-slot — Kakuhen slot engine
//!
//! A 3×3 slot machine with payline wins, combo multipliers, free spins and a
//! heightened-chance bonus mode ("kakuhen") with a super jackpot.
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine (Idle → Spinning → Resolving → Idle)
//!     │
//!     ├── ReelGenerator   uniform grids (transient frames + settled grid)
//!     ├── OutcomeResolver payline scan, consolation / super jackpot rolls
//!     ├── SessionLedger   balance, bet, combo, free spins, bonus countdown
//!     └── BalanceRollup   derived display balance
//!           │
//!           v
//!     StageEvent → StageSink (presentation, audio, traces)
//! ```
//!
//! All randomness goes through [`RandomSource`], so every outcome can be
//! scripted in tests.

pub mod bonus;
pub mod config;
pub mod display;
pub mod error;
pub mod grid;
pub mod ledger;
pub mod machine;
pub mod paytable;
pub mod reels;
pub mod resolver;
pub mod rng;
pub mod sink;
pub mod stats;
pub mod symbols;
pub mod timing;

pub use bonus::*;
pub use config::*;
pub use display::*;
pub use error::*;
pub use grid::*;
pub use ledger::*;
pub use machine::*;
pub use paytable::*;
pub use reels::*;
pub use resolver::*;
pub use rng::*;
pub use sink::*;
pub use stats::*;
pub use symbols::*;
pub use timing::*;

pub use ks_stage;
