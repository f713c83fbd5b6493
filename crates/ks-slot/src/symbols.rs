//! Symbol definitions and payout multipliers

use std::fmt;

use serde::{Deserialize, Serialize};

/// A drawable reel symbol
///
/// IDs start at 1; 0 is reserved for the unset cell on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Symbol {
    Cherry = 1,
    Lemon = 2,
    Orange = 3,
    Grape = 4,
    Star = 5,
    Seven = 6,
    Diamond = 7,
}

impl Symbol {
    /// Every drawable symbol in reel order
    pub const ALL: [Symbol; 7] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Orange,
        Symbol::Grape,
        Symbol::Star,
        Symbol::Seven,
        Symbol::Diamond,
    ];

    /// Wire ID
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Look up by wire ID
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.id() == id)
    }

    /// Lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Cherry => "cherry",
            Symbol::Lemon => "lemon",
            Symbol::Orange => "orange",
            Symbol::Grape => "grape",
            Symbol::Star => "star",
            Symbol::Seven => "seven",
            Symbol::Diamond => "diamond",
        }
    }

    /// Glyph for terminal rendering
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Grape => "🍇",
            Symbol::Star => "⭐",
            Symbol::Seven => "7️⃣",
            Symbol::Diamond => "💎",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Positive rational payout multiplier
///
/// Kept as a fraction so credits stay exact integers (cherry pays 6/5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiplier {
    numer: u32,
    denom: u32,
}

impl Multiplier {
    /// Identity multiplier, used for symbols with no declared payout
    pub const ONE: Multiplier = Multiplier { numer: 1, denom: 1 };

    /// Create a fraction; `None` unless both parts are positive
    pub fn new(numer: u32, denom: u32) -> Option<Self> {
        if numer == 0 || denom == 0 {
            return None;
        }
        Some(Self { numer, denom })
    }

    /// Whole-number multiplier (0 is clamped to 1)
    pub fn whole(value: u32) -> Self {
        Self {
            numer: value.max(1),
            denom: 1,
        }
    }

    pub fn numer(&self) -> u32 {
        self.numer
    }

    pub fn denom(&self) -> u32 {
        self.denom
    }

    /// Whether both parts are positive (deserialized values may not be)
    pub fn is_valid(&self) -> bool {
        self.numer > 0 && self.denom > 0
    }

    /// Apply to an amount, rounding down; saturates at `u64::MAX`
    pub fn apply(&self, amount: u64) -> u64 {
        if self.denom == 0 {
            return 0;
        }
        let scaled = amount as u128 * self.numer as u128 / self.denom as u128;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    /// Approximate value for display
    pub fn as_f64(&self) -> f64 {
        if self.denom == 0 {
            return 0.0;
        }
        self.numer as f64 / self.denom as f64
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}x", self.numer)
        } else {
            write!(f, "{}x", self.as_f64())
        }
    }
}

/// A symbol's payout entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolPay {
    pub symbol: Symbol,
    pub multiplier: Multiplier,
}

impl SymbolPay {
    pub fn new(symbol: Symbol, multiplier: Multiplier) -> Self {
        Self { symbol, multiplier }
    }
}

/// Reference payout table
pub fn standard_pays() -> Vec<SymbolPay> {
    vec![
        SymbolPay::new(Symbol::Cherry, Multiplier { numer: 6, denom: 5 }),
        SymbolPay::new(Symbol::Lemon, Multiplier::whole(2)),
        SymbolPay::new(Symbol::Orange, Multiplier::whole(3)),
        SymbolPay::new(Symbol::Grape, Multiplier::whole(5)),
        SymbolPay::new(Symbol::Star, Multiplier::whole(30)),
        SymbolPay::new(Symbol::Seven, Multiplier::whole(100)),
        SymbolPay::new(Symbol::Diamond, Multiplier::whole(10)),
    ]
}
