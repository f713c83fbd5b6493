//! Terminal rendering of grids, outcomes and the status line

use ks_slot::ks_stage::WinTier;
use ks_slot::{BonusDelta, Grid, LineKind, MachineSnapshot, Payline, SpinOutcome, SpinReport};

/// Placeholder for a cell that has not been drawn
const UNSET: &str = "··";

/// Row-major grid, one line per row
pub fn grid(grid: &Grid) -> String {
    (0..grid.row_count())
        .map(|row| row_line(grid, row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-line view of a spinning grid, rows separated by bars
pub fn frame(grid: &Grid) -> String {
    (0..grid.row_count())
        .map(|row| row_line(grid, row))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn row_line(grid: &Grid, row: usize) -> String {
    grid.columns()
        .iter()
        .map(|column| column.get(row).copied().flatten().map_or(UNSET, |s| s.glyph()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn line_name(line: &Payline) -> String {
    let first = line.cells[0];
    match line.kind {
        LineKind::Horizontal => format!("row {}", first.row + 1),
        LineKind::Vertical => format!("column {}", first.column + 1),
        LineKind::Diagonal if first.row == 0 => "diagonal ↘".to_string(),
        LineKind::Diagonal => "diagonal ↗".to_string(),
    }
}

/// Player-facing messages for a resolved spin
pub fn outcome(report: &SpinReport) -> Vec<String> {
    let settlement = &report.settlement;
    let mut lines = Vec::new();

    match &report.outcome {
        SpinOutcome::NoWin => lines.push("No win".to_string()),
        SpinOutcome::LineWin {
            symbol, line, tier, ..
        } => {
            let headline = match tier {
                WinTier::Jackpot => "JACKPOT!",
                _ => "WIN!",
            };
            let mut message = format!(
                "{headline} {} on {}  +{}",
                symbol.name(),
                line_name(line),
                settlement.credit
            );
            if let Some(mult) = settlement.combo_multiplier.filter(|m| *m > 1) {
                message.push_str(&format!("  (combo x{mult})"));
            }
            lines.push(message);
        }
        SpinOutcome::SuperJackpot { symbol } => {
            lines.push(format!(
                "SUPER JACKPOT! Full grid of {}  +{}",
                symbol.name(),
                settlement.credit
            ));
        }
    }

    if settlement.free_spin_awarded {
        lines.push("+1 free spin".to_string());
    }
    match settlement.bonus {
        BonusDelta::Enter { spins } => lines.push(format!("KAKUHEN! {spins} bonus spins")),
        BonusDelta::Exit => lines.push("Bonus mode over".to_string()),
        BonusDelta::None | BonusDelta::Continue { .. } => {}
    }
    lines
}

/// Balance, bet, combo, free spins and bonus countdown
pub fn status(snapshot: &MachineSnapshot) -> String {
    let mut parts = vec![
        format!("Coins {}", snapshot.display_balance),
        format!("Bet {}", snapshot.bet),
    ];
    if snapshot.combo > 0 {
        parts.push(format!("Combo {}", snapshot.combo));
    }
    if snapshot.free_spins > 0 {
        parts.push(format!("Free spins {}", snapshot.free_spins));
    }
    if snapshot.bonus_active {
        parts.push(format!("KAKUHEN {} left", snapshot.bonus_spins_left));
    }
    parts.join("  ·  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ks_slot::{GridSpec, SlotMachine, Symbol, standard_paylines};

    #[test]
    fn test_grid_rows_and_unset_cells() {
        let c = Some(Symbol::Cherry);
        let g = Grid::from_columns(vec![vec![c, None], vec![c, None]]);
        let text = grid(&g);
        let rows: Vec<_> = text.lines().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "🍒 🍒");
        assert_eq!(rows[1], "·· ··");
    }

    #[test]
    fn test_frame_is_single_line() {
        let g = Grid::filled(GridSpec::standard_3x3(), Symbol::Grape);
        let text = frame(&g);
        assert!(!text.contains('\n'));
        assert_eq!(text.matches('|').count(), 2);
    }

    #[test]
    fn test_line_names() {
        let lines = standard_paylines(true);
        assert_eq!(line_name(&lines[0]), "row 1");
        assert_eq!(line_name(&lines[4]), "column 2");
        assert_eq!(line_name(&lines[6]), "diagonal ↘");
        assert_eq!(line_name(&lines[7]), "diagonal ↗");
    }

    #[test]
    fn test_status_shows_only_active_counters() {
        let machine = SlotMachine::default();
        let mut snapshot = machine.snapshot(0);
        assert_eq!(status(&snapshot), "Coins 1000  ·  Bet 50");

        snapshot.combo = 2;
        snapshot.bonus_active = true;
        snapshot.bonus_spins_left = 4;
        let text = status(&snapshot);
        assert!(text.contains("Combo 2"));
        assert!(text.contains("KAKUHEN 4 left"));
        assert!(!text.contains("Free spins"));
    }
}
