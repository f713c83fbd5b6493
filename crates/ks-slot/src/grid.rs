//! Symbol grid (columns × rows)

use serde::{Deserialize, Serialize};

use ks_stage::CellPosition;

use crate::config::GridSpec;
use crate::paytable::Payline;
use crate::symbols::Symbol;

/// A grid cell: a symbol, or `None` while unset
pub type Cell = Option<Symbol>;

/// Column-major symbol grid (`columns[column][row]`)
///
/// Grids are replaced wholesale; every "edit" returns a new grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: Vec<Vec<Cell>>,
}

impl Grid {
    /// All cells unset
    pub fn empty(spec: GridSpec) -> Self {
        Self {
            columns: vec![vec![None; spec.rows as usize]; spec.columns as usize],
        }
    }

    /// Every cell holds `symbol`
    pub fn filled(spec: GridSpec, symbol: Symbol) -> Self {
        Self {
            columns: vec![vec![Some(symbol); spec.rows as usize]; spec.columns as usize],
        }
    }

    /// Build from explicit columns
    pub fn from_columns(columns: Vec<Vec<Cell>>) -> Self {
        Self { columns }
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (of the first column)
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    /// Cell contents; out-of-range reads as unset
    pub fn get(&self, pos: CellPosition) -> Cell {
        self.columns
            .get(pos.column as usize)
            .and_then(|column| column.get(pos.row as usize))
            .copied()
            .flatten()
    }

    /// Columns view
    pub fn columns(&self) -> &[Vec<Cell>] {
        &self.columns
    }

    /// Copy of this grid with the payline's cells set to `symbol`
    pub fn with_line(&self, line: &Payline, symbol: Symbol) -> Self {
        let mut columns = self.columns.clone();
        for pos in line.cells() {
            if let Some(cell) = columns
                .get_mut(pos.column as usize)
                .and_then(|column| column.get_mut(pos.row as usize))
            {
                *cell = Some(symbol);
            }
        }
        Self { columns }
    }

    /// Every cell holds `symbol`
    pub fn is_all(&self, symbol: Symbol) -> bool {
        !self.columns.is_empty()
            && self
                .columns
                .iter()
                .all(|column| column.iter().all(|cell| *cell == Some(symbol)))
    }

    /// Every cell is set
    pub fn is_settled(&self) -> bool {
        self.columns
            .iter()
            .all(|column| column.iter().all(Option::is_some))
    }

    /// Wire form: symbol IDs, 0 for unset
    pub fn to_ids(&self) -> Vec<Vec<u32>> {
        self.columns
            .iter()
            .map(|column| column.iter().map(|cell| cell.map_or(0, Symbol::id)).collect())
            .collect()
    }

    /// Parse wire form; unknown IDs read as unset
    pub fn from_ids(ids: &[Vec<u32>]) -> Self {
        Self {
            columns: ids
                .iter()
                .map(|column| column.iter().map(|&id| Symbol::from_id(id)).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::standard_paylines;

    #[test]
    fn test_empty_grid_is_unset() {
        let grid = Grid::empty(GridSpec::default());
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.get(CellPosition::new(1, 1)), None);
        assert!(!grid.is_settled());
    }

    #[test]
    fn test_out_of_range_reads_unset() {
        let grid = Grid::filled(GridSpec::default(), Symbol::Lemon);
        assert_eq!(grid.get(CellPosition::new(0, 0)), Some(Symbol::Lemon));
        assert_eq!(grid.get(CellPosition::new(3, 0)), None);
        assert_eq!(grid.get(CellPosition::new(0, 9)), None);
    }

    #[test]
    fn test_with_line_returns_new_grid() {
        let grid = Grid::filled(GridSpec::default(), Symbol::Lemon);
        let lines = standard_paylines(true);
        let diagonal = &lines[6];
        let forced = grid.with_line(diagonal, Symbol::Cherry);

        assert_eq!(grid.get(CellPosition::new(1, 1)), Some(Symbol::Lemon));
        for pos in diagonal.cells() {
            assert_eq!(forced.get(pos), Some(Symbol::Cherry));
        }
        assert_eq!(forced.get(CellPosition::new(0, 2)), Some(Symbol::Lemon));
    }

    #[test]
    fn test_is_all() {
        let spec = GridSpec::default();
        assert!(Grid::filled(spec, Symbol::Seven).is_all(Symbol::Seven));
        assert!(!Grid::empty(spec).is_all(Symbol::Seven));
    }

    #[test]
    fn test_ids_roundtrip() {
        let grid = Grid::from_columns(vec![
            vec![Some(Symbol::Cherry), Some(Symbol::Cherry), None],
            vec![Some(Symbol::Star), Some(Symbol::Seven), None],
            vec![Some(Symbol::Diamond), Some(Symbol::Grape), None],
        ]);
        let ids = grid.to_ids();
        assert_eq!(ids[0], vec![1, 1, 0]);
        assert_eq!(Grid::from_ids(&ids), grid);
    }
}
