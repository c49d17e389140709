//! Perfect-play solver over canonical positions

use std::collections::HashMap;

use crate::tictactoe::{BoardState, CanonicalState, Player};

/// Minimax verdict for one canonical position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimalPolicy {
    /// +1 when X wins with best play, -1 when O does, 0 for a draw
    pub value: i32,
    /// Every canonical move reaching `value`, ascending
    pub optimal_moves: Vec<usize>,
}

/// Memoized minimax solver.
///
/// Positions are memoized by canonical form, so the full game needs fewer
/// than a thousand evaluations.
#[derive(Debug, Clone, Default)]
pub struct OptimalSolver {
    memo: HashMap<CanonicalState, OptimalPolicy>,
}

impl OptimalSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positions solved so far
    pub fn solved(&self) -> usize {
        self.memo.len()
    }

    /// Solve `state`, reusing earlier results
    pub fn solve(&mut self, state: CanonicalState) -> OptimalPolicy {
        if let Some(policy) = self.memo.get(&state) {
            return policy.clone();
        }

        let board = state.board();
        let policy = if board.is_terminal() {
            let value = match board.winner() {
                Some(Player::X) => 1,
                Some(Player::O) => -1,
                None => 0,
            };
            OptimalPolicy {
                value,
                optimal_moves: Vec::new(),
            }
        } else {
            let mover = board.to_move();
            let mut best_value = match mover {
                Player::X => i32::MIN,
                Player::O => i32::MAX,
            };
            let mut best_moves = Vec::new();

            for mv in board.legal_moves() {
                let Ok(next) = board.make_move(mv) else {
                    continue;
                };
                let child_value = self.solve(next.canonical()).value;
                let better = match mover {
                    Player::X => child_value > best_value,
                    Player::O => child_value < best_value,
                };
                if better {
                    best_value = child_value;
                    best_moves.clear();
                    best_moves.push(mv);
                } else if child_value == best_value {
                    best_moves.push(mv);
                }
            }

            OptimalPolicy {
                value: best_value,
                optimal_moves: best_moves,
            }
        };

        self.memo.insert(state, policy.clone());
        policy
    }

    /// Game value of `board` under perfect play, from X's side
    pub fn value(&mut self, board: &BoardState) -> i32 {
        self.solve(board.canonical()).value
    }

    /// Optimal moves for the player to move, in `board`'s own orientation
    pub fn optimal_moves(&mut self, board: &BoardState) -> Vec<usize> {
        let ctx = board.canonical_context();
        let mut moves: Vec<usize> = self
            .solve(ctx.state)
            .optimal_moves
            .into_iter()
            .map(|mv| ctx.map_canonical_to_original(mv))
            .collect();
        moves.sort_unstable();
        moves
    }

    /// The lowest optimal move in `board`'s orientation
    pub fn best_move(&mut self, board: &BoardState) -> Option<usize> {
        self.optimal_moves(board).into_iter().next()
    }
}
