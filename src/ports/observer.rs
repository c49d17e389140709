//! Observer port - abstraction for training observation and data collection
//!
//! The engine and the training pipeline report what happens through this
//! trait, so progress bars, metrics and JSONL traces stay out of the game
//! logic.

use crate::{
    Result,
    menace::Outcome,
    tictactoe::{BoardState, CanonicalState, Player},
};

/// Observer trait for monitoring games and training runs
///
/// # Event Sequence
///
/// 1. `on_training_start(total_games)` - once, when driven by the pipeline
/// 2. For each game:
///    - `on_game_start(game_num)`
///    - for every move, `on_engine_choice(...)` first when the engine moves,
///      then `on_move(...)`
///    - `on_weights_updated(...)` once per matchbox touched by the update
///    - `on_game_end(game_num, outcome)`
/// 3. `on_training_end()` - once
///
/// Every method defaults to doing nothing.
///
/// # Examples
///
/// ```
/// use matchbox_menace::{menace::Outcome, ports::Observer};
///
/// #[derive(Default)]
/// struct LossCounter {
///     losses: usize,
/// }
///
/// impl Observer for LossCounter {
///     fn on_game_end(&mut self, _game_num: usize, outcome: Outcome) -> matchbox_menace::Result<()> {
///         if outcome == Outcome::EngineLoss {
///             self.losses += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first game of a run
    fn on_training_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a game starts; `game_num` counts from 0 over the
    /// engine's lifetime
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each move, with the board as it was before the move
    fn on_move(
        &mut self,
        _game_num: usize,
        _step: usize,
        _board: &BoardState,
        _mover: Player,
        _position: usize,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when the engine draws from a matchbox.
    ///
    /// `beads_before` lists `(canonical position, count)` pairs as they were
    /// when the draw happened.
    fn on_engine_choice(
        &mut self,
        _game_num: usize,
        _state: &CanonicalState,
        _canonical_move: usize,
        _beads_before: &[(usize, u32)],
    ) -> Result<()> {
        Ok(())
    }

    /// Called after the learning rule has updated a matchbox
    fn on_weights_updated(
        &mut self,
        _game_num: usize,
        _state: &CanonicalState,
        _beads_after: &[(usize, u32)],
    ) -> Result<()> {
        Ok(())
    }

    /// Called when a game ends, after reinforcement
    fn on_game_end(&mut self, _game_num: usize, _outcome: Outcome) -> Result<()> {
        Ok(())
    }

    /// Called once after the last game of a run
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Fan out each event to every observer in order, stopping at the first error
impl Observer for Vec<Box<dyn Observer>> {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        self.iter_mut()
            .try_for_each(|o| o.on_training_start(total_games))
    }

    fn on_game_start(&mut self, game_num: usize) -> Result<()> {
        self.iter_mut().try_for_each(|o| o.on_game_start(game_num))
    }

    fn on_move(
        &mut self,
        game_num: usize,
        step: usize,
        board: &BoardState,
        mover: Player,
        position: usize,
    ) -> Result<()> {
        self.iter_mut()
            .try_for_each(|o| o.on_move(game_num, step, board, mover, position))
    }

    fn on_engine_choice(
        &mut self,
        game_num: usize,
        state: &CanonicalState,
        canonical_move: usize,
        beads_before: &[(usize, u32)],
    ) -> Result<()> {
        self.iter_mut()
            .try_for_each(|o| o.on_engine_choice(game_num, state, canonical_move, beads_before))
    }

    fn on_weights_updated(
        &mut self,
        game_num: usize,
        state: &CanonicalState,
        beads_after: &[(usize, u32)],
    ) -> Result<()> {
        self.iter_mut()
            .try_for_each(|o| o.on_weights_updated(game_num, state, beads_after))
    }

    fn on_game_end(&mut self, game_num: usize, outcome: Outcome) -> Result<()> {
        self.iter_mut()
            .try_for_each(|o| o.on_game_end(game_num, outcome))
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.iter_mut().try_for_each(|o| o.on_training_end())
    }
}
