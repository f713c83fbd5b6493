//! Reel generator
//!
//! Fills every cell independently and uniformly from the reel symbol set.
//! Used for the transient spinning frames and for the settled grid.

use crate::config::{GridSpec, SlotConfig};
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::symbols::Symbol;

/// Uniform grid generator
#[derive(Debug, Clone)]
pub struct ReelGenerator {
    grid: GridSpec,
    symbols: Vec<Symbol>,
}

impl ReelGenerator {
    pub fn new(grid: GridSpec, symbols: Vec<Symbol>) -> Self {
        Self { grid, symbols }
    }

    pub fn from_config(config: &SlotConfig) -> Self {
        Self::new(config.grid, config.reel_symbols.clone())
    }

    /// Grid shape
    pub fn grid_spec(&self) -> GridSpec {
        self.grid
    }

    /// Fresh grid; cells are drawn column by column, top to bottom.
    /// An empty symbol set yields an all-unset grid.
    pub fn generate(&self, rng: &mut dyn RandomSource) -> Grid {
        if self.symbols.is_empty() {
            return Grid::empty(self.grid);
        }
        let columns = (0..self.grid.columns)
            .map(|_| {
                (0..self.grid.rows)
                    .map(|_| Some(self.symbols[rng.index(self.symbols.len())]))
                    .collect()
            })
            .collect();
        Grid::from_columns(columns)
    }
}

impl Default for ReelGenerator {
    fn default() -> Self {
        Self::new(GridSpec::default(), Symbol::ALL.to_vec())
    }
}
