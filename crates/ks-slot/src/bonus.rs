//! Bonus mode ("kakuhen") state
//!
//! The active state carries a non-zero countdown, so a set flag with zero
//! spins left cannot be represented. Leaving bonus mode happens in the same
//! step that consumes the last spin.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Bonus mode flag and countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BonusMode {
    #[default]
    Inactive,
    Active { spins_left: NonZeroU32 },
}

impl BonusMode {
    /// Active with `spins` remaining; `None` for zero
    pub fn active(spins: u32) -> Option<Self> {
        NonZeroU32::new(spins).map(|spins_left| Self::Active { spins_left })
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Remaining bonus spins (0 when inactive)
    pub fn spins_left(&self) -> u32 {
        match self {
            Self::Inactive => 0,
            Self::Active { spins_left } => spins_left.get(),
        }
    }

    /// Delta for one spin resolved under bonus rules
    pub fn step(&self) -> BonusDelta {
        match self {
            Self::Inactive => BonusDelta::None,
            Self::Active { spins_left } => match NonZeroU32::new(spins_left.get() - 1) {
                Some(left) => BonusDelta::Continue { spins_left: left },
                None => BonusDelta::Exit,
            },
        }
    }

    /// State after applying a resolver delta
    pub fn apply(self, delta: BonusDelta) -> Self {
        match delta {
            BonusDelta::None => self,
            BonusDelta::Enter { spins } => Self::Active { spins_left: spins },
            BonusDelta::Continue { spins_left } => Self::Active { spins_left },
            BonusDelta::Exit => Self::Inactive,
        }
    }
}

/// Change to bonus mode signalled by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BonusDelta {
    /// Unchanged
    None,
    /// Bonus mode entered with a fresh allotment
    Enter { spins: NonZeroU32 },
    /// One bonus spin consumed, more remain
    Continue { spins_left: NonZeroU32 },
    /// Last bonus spin consumed
    Exit,
}

impl BonusDelta {
    /// A bonus spin was consumed by this resolution
    pub fn consumed_spin(&self) -> bool {
        matches!(self, Self::Continue { .. } | Self::Exit)
    }
}
