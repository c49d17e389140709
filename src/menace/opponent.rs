//! Opponents the engine can train against

use std::{fmt, str::FromStr};

use rand::rngs::StdRng;

use super::optimal::OptimalSolver;
use crate::{
    ports::{DrawSource, rng_from_seed},
    tictactoe::BoardState,
};

/// The other side of the board.
///
/// Implementations receive the current board and its legal moves and must
/// answer with one of those moves. The engine checks the answer and fails
/// the game with [`crate::Error::IllegalOpponentMove`] otherwise.
pub trait Opponent {
    fn choose_move(&mut self, board: &BoardState, legal_moves: &[usize]) -> crate::Result<usize>;

    fn name(&self) -> &str;
}

impl<O: Opponent + ?Sized> Opponent for Box<O> {
    fn choose_move(&mut self, board: &BoardState, legal_moves: &[usize]) -> crate::Result<usize> {
        (**self).choose_move(board, legal_moves)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Uniformly random legal moves
#[derive(Debug, Clone)]
pub struct RandomOpponent<D: DrawSource = StdRng> {
    draws: D,
}

impl RandomOpponent<StdRng> {
    /// Seeded when `seed` is given, otherwise seeded from the OS
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self::new(rng_from_seed(seed))
    }
}

impl<D: DrawSource> RandomOpponent<D> {
    pub fn new(draws: D) -> Self {
        Self { draws }
    }
}

impl<D: DrawSource> Opponent for RandomOpponent<D> {
    fn choose_move(&mut self, _board: &BoardState, legal_moves: &[usize]) -> crate::Result<usize> {
        let count = u32::try_from(legal_moves.len()).map_err(|_| crate::Error::NoValidMoves)?;
        if count == 0 {
            return Err(crate::Error::NoValidMoves);
        }
        let index = self.draws.draw_below(count) as usize;
        Ok(legal_moves[index])
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Always takes the lowest-numbered empty cell
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialOpponent;

impl Opponent for SequentialOpponent {
    fn choose_move(&mut self, _board: &BoardState, legal_moves: &[usize]) -> crate::Result<usize> {
        legal_moves
            .iter()
            .min()
            .copied()
            .ok_or(crate::Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "sequential"
    }
}

/// Replays a fixed list of positions, one per turn.
///
/// Positions are returned as given, even if illegal, so tests can drive the
/// engine's validation path.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOpponent {
    moves: Vec<usize>,
    cursor: usize,
}

impl ScriptedOpponent {
    pub fn new(moves: impl Into<Vec<usize>>) -> Self {
        Self {
            moves: moves.into(),
            cursor: 0,
        }
    }
}

impl Opponent for ScriptedOpponent {
    fn choose_move(&mut self, _board: &BoardState, _legal_moves: &[usize]) -> crate::Result<usize> {
        let position = self
            .moves
            .get(self.cursor)
            .copied()
            .ok_or(crate::Error::NoValidMoves)?;
        self.cursor += 1;
        Ok(position)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Minimax play, lowest optimal move first
#[derive(Debug, Clone, Default)]
pub struct PerfectOpponent {
    solver: OptimalSolver,
}

impl PerfectOpponent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Opponent for PerfectOpponent {
    fn choose_move(&mut self, board: &BoardState, _legal_moves: &[usize]) -> crate::Result<usize> {
        self.solver.best_move(board).ok_or(crate::Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "perfect"
    }
}

/// Opponent selection for the CLI and configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpponentKind {
    #[default]
    Random,
    Sequential,
    Perfect,
}

impl OpponentKind {
    pub const VARIANTS: &'static str = "random, sequential, perfect";

    /// Build the opponent. Only the random opponent consumes `seed`.
    pub fn build(self, seed: Option<u64>) -> Box<dyn Opponent> {
        match self {
            OpponentKind::Random => Box::new(RandomOpponent::from_seed(seed)),
            OpponentKind::Sequential => Box::new(SequentialOpponent),
            OpponentKind::Perfect => Box::new(PerfectOpponent::new()),
        }
    }
}

impl FromStr for OpponentKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(OpponentKind::Random),
            "sequential" | "seq" => Ok(OpponentKind::Sequential),
            "perfect" | "optimal" | "minimax" => Ok(OpponentKind::Perfect),
            _ => Err(crate::Error::ParseOpponent {
                input: s.to_string(),
                expected: Self::VARIANTS.to_string(),
            }),
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OpponentKind::Random => "random",
            OpponentKind::Sequential => "sequential",
            OpponentKind::Perfect => "perfect",
        })
    }
}
