//! Paylines, multiplier lookup and natural win scanning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ks_stage::{CellPosition, WinLine};

use crate::config::PaytableConfig;
use crate::grid::Grid;
use crate::symbols::{Multiplier, Symbol};

/// Payline orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Horizontal,
    Vertical,
    Diagonal,
}

/// A straight three-cell line across the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payline {
    /// Position in the priority order (0-based)
    pub index: u8,
    /// Cells, in the order they are drawn
    pub cells: [CellPosition; 3],
    /// Orientation
    pub kind: LineKind,
}

impl Payline {
    /// Row across all columns
    pub fn horizontal(index: u8, row: u8) -> Self {
        Self {
            index,
            cells: [0, 1, 2].map(|column| CellPosition::new(column, row)),
            kind: LineKind::Horizontal,
        }
    }

    /// Column across all rows
    pub fn vertical(index: u8, column: u8) -> Self {
        Self {
            index,
            cells: [0, 1, 2].map(|row| CellPosition::new(column, row)),
            kind: LineKind::Vertical,
        }
    }

    /// Top-left to bottom-right
    pub fn falling_diagonal(index: u8) -> Self {
        Self {
            index,
            cells: [0, 1, 2].map(|i| CellPosition::new(i, i)),
            kind: LineKind::Diagonal,
        }
    }

    /// Bottom-left to top-right
    pub fn rising_diagonal(index: u8) -> Self {
        Self {
            index,
            cells: [0, 1, 2].map(|i| CellPosition::new(i, 2 - i)),
            kind: LineKind::Diagonal,
        }
    }

    /// Cells of this line
    pub fn cells(&self) -> [CellPosition; 3] {
        self.cells
    }

    /// The symbol filling all three cells, if any (unset never matches)
    pub fn matched_symbol(&self, grid: &Grid) -> Option<Symbol> {
        let first = grid.get(self.cells[0])?;
        self.cells[1..]
            .iter()
            .all(|&pos| grid.get(pos) == Some(first))
            .then_some(first)
    }

    /// Presentation form of this line
    pub fn to_win_line(&self, symbol: Symbol) -> WinLine {
        WinLine {
            line_index: self.index,
            positions: self.cells.to_vec(),
            symbol_id: symbol.id(),
            symbol_name: Some(symbol.name().to_string()),
        }
    }
}

/// Paylines for a 3×3 grid in priority order:
/// rows top to bottom, columns left to right, then both diagonals
pub fn standard_paylines(vertical: bool) -> Vec<Payline> {
    let mut lines = Vec::with_capacity(8);
    for row in 0..3 {
        lines.push(Payline::horizontal(lines.len() as u8, row));
    }
    if vertical {
        for column in 0..3 {
            lines.push(Payline::vertical(lines.len() as u8, column));
        }
    }
    lines.push(Payline::falling_diagonal(lines.len() as u8));
    lines.push(Payline::rising_diagonal(lines.len() as u8));
    lines
}

/// A natural line match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'a> {
    pub symbol: Symbol,
    pub line: &'a Payline,
}

/// Complete paytable
#[derive(Debug, Clone)]
pub struct PayTable {
    multipliers: HashMap<Symbol, Multiplier>,
    /// Payline definitions in priority order
    pub paylines: Vec<Payline>,
    /// Forced low-tier win symbol
    pub consolation_symbol: Symbol,
    /// Enters bonus mode
    pub bonus_trigger_symbol: Symbol,
    /// Grants a free spin
    pub free_spin_symbol: Symbol,
    /// Jackpot tier symbol
    pub jackpot_symbol: Symbol,
}

impl PayTable {
    /// Build from configuration
    pub fn from_config(config: &PaytableConfig) -> Self {
        Self {
            multipliers: config
                .symbols
                .iter()
                .map(|pay| (pay.symbol, pay.multiplier))
                .collect(),
            paylines: standard_paylines(config.vertical_lines),
            consolation_symbol: config.consolation_symbol,
            bonus_trigger_symbol: config.bonus_trigger_symbol,
            free_spin_symbol: config.free_spin_symbol,
            jackpot_symbol: config.jackpot_symbol,
        }
    }

    /// Payout multiplier; undeclared symbols pay 1×
    pub fn multiplier(&self, symbol: Symbol) -> Multiplier {
        self.multipliers
            .get(&symbol)
            .copied()
            .unwrap_or(Multiplier::ONE)
    }

    /// First payline, in declared order, whose three cells match
    pub fn scan<'a>(&'a self, grid: &Grid) -> Option<LineMatch<'a>> {
        self.paylines.iter().find_map(|line| {
            line.matched_symbol(grid)
                .map(|symbol| LineMatch { symbol, line })
        })
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::from_config(&PaytableConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;
    use crate::symbols::SymbolPay;

    fn grid(rows: [[Option<Symbol>; 3]; 3]) -> Grid {
        // rows[row][column] → column-major
        Grid::from_columns(
            (0..3)
                .map(|c| (0..3).map(|r| rows[r][c]).collect())
                .collect(),
        )
    }

    const C: Option<Symbol> = Some(Symbol::Cherry);
    const L: Option<Symbol> = Some(Symbol::Lemon);
    const S: Option<Symbol> = Some(Symbol::Seven);
    const D: Option<Symbol> = Some(Symbol::Diamond);

    #[test]
    fn test_standard_paylines_order() {
        let lines = standard_paylines(true);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].kind, LineKind::Horizontal);
        assert_eq!(lines[3].kind, LineKind::Vertical);
        assert_eq!(lines[3].cells[2], CellPosition::new(0, 2));
        assert_eq!(lines[6].cells[1], CellPosition::new(1, 1));
        assert_eq!(lines[7].cells[0], CellPosition::new(0, 2));
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.index as usize, i);
        }
        assert_eq!(standard_paylines(false).len(), 5);
    }

    #[test]
    fn test_scan_first_match_wins() {
        let table = PayTable::default();
        // Row 0 and column 0 both cherries; row comes first
        let g = grid([[C, C, C], [C, L, S], [C, S, L]]);
        let hit = table.scan(&g).unwrap();
        assert_eq!(hit.symbol, Symbol::Cherry);
        assert_eq!(hit.line.index, 0);

        // Column 0 forced to diamonds; no row matches
        let g = grid([[D, L, S], [D, S, L], [S, L, C]]);
        let g = g.with_line(&table.paylines[3], Symbol::Diamond);
        let hit = table.scan(&g).unwrap();
        assert_eq!(hit.symbol, Symbol::Diamond);
        assert_eq!(hit.line.kind, LineKind::Vertical);
    }

    #[test]
    fn test_scan_diagonal() {
        let table = PayTable::default();
        let g = grid([[L, C, S], [C, S, L], [S, L, C]]);
        let hit = table.scan(&g).unwrap();
        assert_eq!(hit.symbol, Symbol::Seven);
        assert_eq!(hit.line.index, 7);
    }

    #[test]
    fn test_unset_never_matches() {
        let table = PayTable::default();
        assert!(table.scan(&Grid::empty(GridSpec::default())).is_none());
        let g = grid([[None, None, None], [C, L, S], [L, S, C]]);
        assert!(table.scan(&g).is_none());
    }

    #[test]
    fn test_vertical_lines_optional() {
        let table = PayTable::from_config(&PaytableConfig {
            vertical_lines: false,
            ..PaytableConfig::default()
        });
        let g = grid([[C, L, S], [C, S, L], [C, L, D]]);
        assert!(table.scan(&g).is_none());
        assert!(PayTable::default().scan(&g).is_some());
    }

    #[test]
    fn test_missing_multiplier_defaults_to_one() {
        let table = PayTable::from_config(&PaytableConfig {
            symbols: vec![SymbolPay::new(Symbol::Seven, Multiplier::whole(100))],
            ..PaytableConfig::default()
        });
        assert_eq!(table.multiplier(Symbol::Grape), Multiplier::ONE);
        assert_eq!(table.multiplier(Symbol::Seven), Multiplier::whole(100));
        assert_eq!(
            PayTable::default().multiplier(Symbol::Cherry),
            Multiplier::new(6, 5).unwrap()
        );
    }

    #[test]
    fn test_win_line_conversion() {
        let line = Payline::horizontal(1, 1);
        let win = line.to_win_line(Symbol::Cherry);
        assert_eq!(win.line_index, 1);
        assert_eq!(win.symbol_id, 1);
        assert_eq!(win.positions.len(), 3);
    }
}
