//! Rejected user actions
//!
//! Rejections are ordinary values: the action does not happen and state is
//! untouched. Nothing in the engine is fatal.

use ks_stage::RejectReason;

/// Why a spin request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpinRejection {
    #[error("insufficient balance: {balance} < bet {bet}")]
    InsufficientBalance { balance: u64, bet: u64 },

    #[error("a spin is already in progress")]
    AlreadySpinning,

    #[error("no free spins available")]
    NoFreeSpins,

    #[error("free spins must be used first ({credit} pending)")]
    FreeSpinsPending { credit: u32 },
}

impl SpinRejection {
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::InsufficientBalance { .. } => RejectReason::InsufficientBalance,
            Self::AlreadySpinning => RejectReason::AlreadySpinning,
            Self::NoFreeSpins => RejectReason::NoFreeSpins,
            Self::FreeSpinsPending { .. } => RejectReason::FreeSpinsPending,
        }
    }
}

/// Why a bet change was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BetRejection {
    #[error("bet is locked while bonus mode is active")]
    BonusModeActive,

    #[error("bet cannot change during a spin")]
    AlreadySpinning,
}

impl BetRejection {
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::BonusModeActive => RejectReason::BonusModeActive,
            Self::AlreadySpinning => RejectReason::AlreadySpinning,
        }
    }
}

/// Either kind of rejection, as returned by `SlotMachine::dispatch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error(transparent)]
    Spin(#[from] SpinRejection),

    #[error(transparent)]
    Bet(#[from] BetRejection),
}

impl Rejection {
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::Spin(r) => r.reason(),
            Self::Bet(r) => r.reason(),
        }
    }
}
