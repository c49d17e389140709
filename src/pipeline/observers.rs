//! Observer implementations for training runs
//!
//! Progress bars, in-memory metrics and JSON Lines traces, all plugged into
//! the pipeline through [`Observer`].

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    menace::Outcome,
    pipeline::Tally,
    ports::Observer,
    tictactoe::{BoardState, CanonicalState, Player},
};

/// One move of a recorded game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveObservation {
    pub step: usize,
    /// Board before the move
    pub board: String,
    pub mover: Player,
    pub position: usize,
}

/// One matchbox draw of a recorded game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionObservation {
    pub canonical_state: String,
    pub canonical_move: usize,
    pub beads_before: Vec<(usize, u32)>,
    /// Filled in once the game's reinforcement has been applied
    pub beads_after: Option<Vec<(usize, u32)>>,
}

/// Complete observation of a training game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub game_num: usize,
    pub outcome: Outcome,
    pub total_moves: usize,
    pub moves: Vec<MoveObservation>,
    pub decisions: Vec<DecisionObservation>,
}

/// Progress bar observer - shows training progress with a running tally
#[derive(Default)]
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    tally: Tally,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive an already styled bar instead of the default one
    pub fn with_bar(progress_bar: ProgressBar) -> Self {
        Self {
            progress_bar: Some(progress_bar),
            tally: Tally::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "W:{} D:{} L:{}",
            self.tally.engine_wins, self.tally.draws, self.tally.engine_losses
        )
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_length(total_games as u64);
            return Ok(());
        }
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, outcome: Outcome) -> Result<()> {
        self.tally.record(outcome);
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub engine_wins: usize,
    pub draws: usize,
    pub engine_losses: usize,
    pub avg_game_length: f64,
    /// Matchbox draws made by the engine
    pub engine_decisions: usize,
}

#[derive(Debug, Default)]
struct MetricsState {
    tally: Tally,
    move_counts: Vec<usize>,
    engine_decisions: usize,
}

/// Metrics observer - tracks outcomes and game lengths.
///
/// The observer is usually moved into a pipeline; keep a [`MetricsHandle`]
/// to read the numbers afterwards.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    state: Arc<Mutex<MetricsState>>,
}

/// Read side of a [`MetricsObserver`]
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    state: Arc<Mutex<MetricsState>>,
}

fn lock(state: &Mutex<MetricsState>) -> MutexGuard<'_, MetricsState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MetricsHandle {
        MetricsHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        self.handle().summary()
    }
}

impl MetricsHandle {
    pub fn summary(&self) -> MetricsSummary {
        let state = lock(&self.state);
        let avg_game_length = if state.move_counts.is_empty() {
            0.0
        } else {
            state.move_counts.iter().sum::<usize>() as f64 / state.move_counts.len() as f64
        };
        MetricsSummary {
            total_games: state.tally.games(),
            engine_wins: state.tally.engine_wins,
            draws: state.tally.draws,
            engine_losses: state.tally.engine_losses,
            avg_game_length,
            engine_decisions: state.engine_decisions,
        }
    }
}

impl Observer for MetricsObserver {
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        lock(&self.state).move_counts.push(0);
        Ok(())
    }

    fn on_move(
        &mut self,
        _game_num: usize,
        _step: usize,
        _board: &BoardState,
        _mover: Player,
        _position: usize,
    ) -> Result<()> {
        if let Some(last) = lock(&self.state).move_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_engine_choice(
        &mut self,
        _game_num: usize,
        _state: &CanonicalState,
        _canonical_move: usize,
        _beads_before: &[(usize, u32)],
    ) -> Result<()> {
        lock(&self.state).engine_decisions += 1;
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, outcome: Outcome) -> Result<()> {
        lock(&self.state).tally.record(outcome);
        Ok(())
    }
}

/// JSONL observer - writes one [`Observation`] per game
pub struct JsonlObserver {
    writer: BufWriter<File>,
    moves: Vec<MoveObservation>,
    decisions: Vec<DecisionObservation>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| crate::Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            moves: Vec::new(),
            decisions: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        self.moves.clear();
        self.decisions.clear();
        Ok(())
    }

    fn on_move(
        &mut self,
        _game_num: usize,
        step: usize,
        board: &BoardState,
        mover: Player,
        position: usize,
    ) -> Result<()> {
        self.moves.push(MoveObservation {
            step,
            board: board.encode(),
            mover,
            position,
        });
        Ok(())
    }

    fn on_engine_choice(
        &mut self,
        _game_num: usize,
        state: &CanonicalState,
        canonical_move: usize,
        beads_before: &[(usize, u32)],
    ) -> Result<()> {
        self.decisions.push(DecisionObservation {
            canonical_state: state.encode(),
            canonical_move,
            beads_before: beads_before.to_vec(),
            beads_after: None,
        });
        Ok(())
    }

    fn on_weights_updated(
        &mut self,
        _game_num: usize,
        state: &CanonicalState,
        beads_after: &[(usize, u32)],
    ) -> Result<()> {
        let encoded = state.encode();
        if let Some(decision) = self
            .decisions
            .iter_mut()
            .rfind(|d| d.canonical_state == encoded)
        {
            decision.beads_after = Some(beads_after.to_vec());
        }
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, outcome: Outcome) -> Result<()> {
        let observation = Observation {
            game_num,
            outcome,
            total_moves: self.moves.len(),
            moves: std::mem::take(&mut self.moves),
            decisions: std::mem::take(&mut self.decisions),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
