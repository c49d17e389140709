//! The eight winning lines and queries over them

use super::{Cell, Player};

/// Rows, then columns, then the two diagonals
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Stateless helpers over [`WINNING_LINES`]
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// True when `player` owns all three cells of some line
    pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
        let mark = player.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == mark))
    }

    /// Empty cells that would complete a line for `player`, ascending and
    /// without duplicates
    pub fn winning_moves(cells: &[Cell; 9], player: Player) -> Vec<usize> {
        let mut moves: Vec<usize> = WINNING_LINES
            .iter()
            .filter_map(|line| Self::completing_cell(cells, player, line))
            .collect();
        moves.sort_unstable();
        moves.dedup();
        moves
    }

    /// True when `player` has two in a line with the third cell empty
    pub fn has_immediate_win(cells: &[Cell; 9], player: Player) -> bool {
        WINNING_LINES
            .iter()
            .any(|line| Self::completing_cell(cells, player, line).is_some())
    }

    fn completing_cell(cells: &[Cell; 9], player: Player, line: &[usize; 3]) -> Option<usize> {
        let mark = player.to_cell();
        let mut owned = 0;
        let mut gap = None;

        for &idx in line {
            match cells[idx] {
                Cell::Empty if gap.is_none() => gap = Some(idx),
                Cell::Empty => return None,
                c if c == mark => owned += 1,
                _ => return None,
            }
        }

        if owned == 2 { gap } else { None }
    }
}
