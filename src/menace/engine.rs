//! The MENACE engine: plays whole games and learns from them
//!
//! A game is a small state machine driven by [`EnginePhase`]. The engine's
//! own moves come from matchboxes keyed by canonical state; every engine
//! move is remembered in a [`GameRecord`] and, once the board is decided,
//! every recorded move receives the same bead adjustment.

use rand::rngs::StdRng;

use super::{
    opponent::Opponent,
    reinforcement::{Outcome, ReinforcementValues},
    store::{InitialBeadSchedule, MatchboxStore},
};
use crate::{
    ports::{DrawSource, NoopObserver, Observer, rng_from_seed},
    tictactoe::{BoardState, CanonicalState, D4Transform, Player, canonicalize},
};

/// Whose turn it is, or how the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    AwaitingOpponentMove,
    AwaitingEngineMove,
    Terminal(Outcome),
}

impl EnginePhase {
    /// Phase of `board` for an engine sitting in `seat`
    pub fn for_board(board: &BoardState, seat: Player) -> Self {
        match Outcome::from_status(board.terminal_status(), seat) {
            Some(outcome) => EnginePhase::Terminal(outcome),
            None if board.to_move() == seat => EnginePhase::AwaitingEngineMove,
            None => EnginePhase::AwaitingOpponentMove,
        }
    }
}

/// One policy step: the draw in canonical coordinates and its real position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMove {
    /// Cell on the real board
    pub position: usize,
    pub canonical_state: CanonicalState,
    /// Cell in the canonical orientation, as stored in the matchbox
    pub canonical_move: usize,
    /// Maps real coordinates onto canonical ones
    pub transform: D4Transform,
}

/// The engine's moves in one game, in order of play
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    entries: Vec<(CanonicalState, usize)>,
}

impl GameRecord {
    pub fn push(&mut self, state: CanonicalState, canonical_move: usize) {
        self.entries.push((state, canonical_move));
    }

    pub fn entries(&self) -> &[(CanonicalState, usize)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything that happened in one finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub outcome: Outcome,
    pub final_board: BoardState,
    /// Every position played, both sides, in order
    pub moves: Vec<usize>,
    pub record: GameRecord,
}

/// A learning MENACE player.
///
/// The engine owns its matchboxes and its random source; games are played
/// one at a time through `&mut self`, so learning accumulates serially.
#[derive(Debug, Clone)]
pub struct Engine<D: DrawSource = StdRng> {
    store: MatchboxStore,
    reinforcement: ReinforcementValues,
    seat: Player,
    draws: D,
    games_played: u64,
}

impl Engine<StdRng> {
    /// Engine drawing from a `StdRng`, seeded when `seed` is given
    pub fn seeded(
        seat: Player,
        schedule: InitialBeadSchedule,
        reinforcement: ReinforcementValues,
        seed: Option<u64>,
    ) -> Self {
        Self::new(seat, schedule, reinforcement, rng_from_seed(seed))
    }
}

impl<D: DrawSource> Engine<D> {
    pub fn new(
        seat: Player,
        schedule: InitialBeadSchedule,
        reinforcement: ReinforcementValues,
        draws: D,
    ) -> Self {
        Self::with_store(MatchboxStore::new(schedule), seat, reinforcement, draws, 0)
    }

    /// Resume from an existing store, e.g. one loaded from disk
    pub fn with_store(
        store: MatchboxStore,
        seat: Player,
        reinforcement: ReinforcementValues,
        draws: D,
        games_played: u64,
    ) -> Self {
        Self {
            store,
            reinforcement,
            seat,
            draws,
            games_played,
        }
    }

    pub fn seat(&self) -> Player {
        self.seat
    }

    pub fn store(&self) -> &MatchboxStore {
        &self.store
    }

    pub fn reinforcement(&self) -> &ReinforcementValues {
        &self.reinforcement
    }

    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    /// Pick the engine's move on `board`, opening its matchbox if needed.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::OutOfTurn`] when it is not the engine's turn
    /// - [`crate::Error::GameOver`] on a finished board
    /// - [`crate::Error::EmptyMatchbox`] if the matchbox holds no beads
    pub fn select_move(&mut self, board: &BoardState) -> crate::Result<EngineMove> {
        if board.is_terminal() {
            return Err(crate::Error::GameOver);
        }
        if board.to_move() != self.seat {
            return Err(crate::Error::OutOfTurn {
                expected: board.to_move(),
                got: self.seat,
            });
        }

        let ctx = canonicalize(board);
        let legal = ctx.state.legal_moves();
        let matchbox = self.store.get_or_create(ctx.state, &legal)?;
        let canonical_move = matchbox.select_move(&mut self.draws)?;
        let position = ctx.map_canonical_to_original(canonical_move);
        debug_assert!(board.is_empty(position), "matchbox produced occupied cell");

        Ok(EngineMove {
            position,
            canonical_state: ctx.state,
            canonical_move,
            transform: ctx.transform,
        })
    }

    /// Play one full game against `opponent` and learn from it
    pub fn play_game(&mut self, opponent: &mut dyn Opponent) -> crate::Result<Outcome> {
        self.play_game_observed(opponent, &mut NoopObserver)
    }

    /// [`Engine::play_game`] with every event reported to `observer`
    pub fn play_game_observed(
        &mut self,
        opponent: &mut dyn Opponent,
        observer: &mut dyn Observer,
    ) -> crate::Result<Outcome> {
        Ok(self.play_game_report(opponent, observer)?.outcome)
    }

    /// Play one game and return the full account of it
    ///
    /// # Errors
    ///
    /// [`crate::Error::IllegalOpponentMove`] when the opponent answers with a
    /// cell outside the legal set; any board or matchbox error is passed
    /// through and ends the game without learning.
    pub fn play_game_report(
        &mut self,
        opponent: &mut dyn Opponent,
        observer: &mut dyn Observer,
    ) -> crate::Result<GameReport> {
        let game_num = usize::try_from(self.games_played).unwrap_or(usize::MAX);
        observer.on_game_start(game_num)?;

        let mut board = BoardState::new();
        let mut record = GameRecord::default();
        let mut moves = Vec::with_capacity(9);

        let outcome = loop {
            let step = moves.len();
            match EnginePhase::for_board(&board, self.seat) {
                EnginePhase::AwaitingOpponentMove => {
                    let legal = board.legal_moves();
                    let position = opponent.choose_move(&board, &legal)?;
                    if !legal.contains(&position) {
                        return Err(crate::Error::IllegalOpponentMove {
                            position,
                            board: board.encode(),
                        });
                    }
                    let mover = self.seat.opponent();
                    observer.on_move(game_num, step, &board, mover, position)?;
                    board = board.apply_move(position, mover)?;
                    moves.push(position);
                }
                EnginePhase::AwaitingEngineMove => {
                    let choice = self.select_move(&board)?;
                    if let Some(matchbox) = self.store.get(&choice.canonical_state) {
                        let beads: Vec<(usize, u32)> = matchbox.beads().collect();
                        observer.on_engine_choice(
                            game_num,
                            &choice.canonical_state,
                            choice.canonical_move,
                            &beads,
                        )?;
                    }
                    observer.on_move(game_num, step, &board, self.seat, choice.position)?;
                    board = board.apply_move(choice.position, self.seat)?;
                    record.push(choice.canonical_state, choice.canonical_move);
                    moves.push(choice.position);
                }
                EnginePhase::Terminal(outcome) => break outcome,
            }
        };

        self.learn(&record, outcome, game_num, observer)?;
        self.games_played += 1;
        observer.on_game_end(game_num, outcome)?;

        Ok(GameReport {
            outcome,
            final_board: board,
            moves,
            record,
        })
    }

    /// Apply the learning rule for `outcome` to every move in `record`
    pub fn learn(
        &mut self,
        record: &GameRecord,
        outcome: Outcome,
        game_num: usize,
        observer: &mut dyn Observer,
    ) -> crate::Result<()> {
        for (state, canonical_move) in record.entries() {
            self.store
                .reinforce(state, *canonical_move, outcome, &self.reinforcement)?;
            if let Some(matchbox) = self.store.get(state) {
                let beads: Vec<(usize, u32)> = matchbox.beads().collect();
                observer.on_weights_updated(game_num, state, &beads)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::ScriptedDraws,
        menace::opponent::{ScriptedOpponent, SequentialOpponent},
    };

    fn scripted_engine(seat: Player, script: Vec<u32>) -> Engine<ScriptedDraws> {
        Engine::new(
            seat,
            InitialBeadSchedule::uniform(3),
            ReinforcementValues::default(),
            ScriptedDraws::new(script),
        )
    }

    #[test]
    fn phase_follows_turn_and_result() {
        let empty = BoardState::new();
        assert_eq!(
            EnginePhase::for_board(&empty, Player::O),
            EnginePhase::AwaitingOpponentMove
        );
        assert_eq!(
            EnginePhase::for_board(&empty, Player::X),
            EnginePhase::AwaitingEngineMove
        );
        let won = BoardState::from_string("XXXOO....").unwrap();
        assert_eq!(
            EnginePhase::for_board(&won, Player::O),
            EnginePhase::Terminal(Outcome::EngineLoss)
        );
    }

    #[test]
    fn select_move_maps_back_to_real_board() {
        let mut engine = scripted_engine(Player::O, vec![0]);
        let board = BoardState::from_string("X........").unwrap();
        let choice = engine.select_move(&board).unwrap();

        assert_eq!(choice.canonical_state.encode(), "........X");
        assert_eq!(choice.canonical_move, 0);
        assert_eq!(choice.transform.transform_position(choice.position), 0);
        assert!(board.is_empty(choice.position));
        assert_eq!(engine.store().len(), 1);
    }

    #[test]
    fn select_move_refuses_wrong_turn() {
        let mut engine = scripted_engine(Player::O, vec![0]);
        assert!(matches!(
            engine.select_move(&BoardState::new()),
            Err(crate::Error::OutOfTurn { .. })
        ));
    }

    #[test]
    fn illegal_opponent_move_is_reported() {
        let mut engine = scripted_engine(Player::O, vec![0]);
        let mut opponent = ScriptedOpponent::new(vec![4, 4]);
        let err = engine.play_game(&mut opponent).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::IllegalOpponentMove { position: 4, .. }
        ));
        assert_eq!(engine.games_played(), 0);
    }

    #[test]
    fn win_adds_a_bead_to_each_recorded_move() {
        let mut engine = scripted_engine(Player::O, vec![8]);
        let report = engine
            .play_game_report(&mut SequentialOpponent, &mut NoopObserver)
            .unwrap();

        assert_eq!(report.outcome, Outcome::EngineWin);
        for (state, mv) in report.record.entries() {
            assert_eq!(engine.store().get(state).unwrap().bead_count(*mv), Some(4));
        }
        assert_eq!(engine.games_played(), 1);
    }

    #[test]
    fn engine_can_open_as_x() {
        let mut engine = scripted_engine(Player::X, vec![0]);
        let report = engine
            .play_game_report(&mut SequentialOpponent, &mut NoopObserver)
            .unwrap();
        assert_eq!(report.moves[0], 0);
        assert_eq!(
            report.record.entries()[0].0.encode(),
            "........."
        );
    }
}
