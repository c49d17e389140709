//! Serial training runs: many games against one opponent, tallied in blocks

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    menace::{Engine, Opponent, Outcome, StoreStats},
    ports::{DrawSource, Observer},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of games to play
    pub games: usize,

    /// Games per reporting block
    pub block_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            games: 1_000,
            block_size: 100,
        }
    }
}

impl TrainingConfig {
    pub fn new(games: usize, block_size: usize) -> Self {
        Self { games, block_size }
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "block size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Win/draw/loss counts from the engine's side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub engine_wins: usize,
    pub engine_losses: usize,
    pub draws: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::EngineWin => self.engine_wins += 1,
            Outcome::EngineLoss => self.engine_losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn games(&self) -> usize {
        self.engine_wins + self.engine_losses + self.draws
    }

    fn rate(&self, count: usize) -> f64 {
        match self.games() {
            0 => 0.0,
            games => count as f64 / games as f64,
        }
    }

    pub fn engine_win_rate(&self) -> f64 {
        self.rate(self.engine_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    /// Share of games the opponent won
    pub fn opponent_win_rate(&self) -> f64 {
        self.rate(self.engine_losses)
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Tally over the whole run
    pub total: Tally,

    /// One tally per block of `block_size` games; the last may be shorter
    pub blocks: Vec<Tally>,

    pub block_size: usize,

    /// Store statistics after the last game
    pub store: StoreStats,
}

impl TrainingReport {
    /// Opponent win rate of each block, in order
    pub fn opponent_win_rates(&self) -> Vec<f64> {
        self.blocks.iter().map(Tally::opponent_win_rate).collect()
    }

    /// Save report to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| crate::Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a report from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| crate::Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Drives an engine through a run of games
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Play `config.games` games in sequence, learning after each.
    ///
    /// The first error from the engine, the opponent or an observer stops
    /// the run and is returned as is.
    pub fn run<D: DrawSource>(
        &mut self,
        engine: &mut Engine<D>,
        opponent: &mut dyn Opponent,
    ) -> Result<TrainingReport> {
        self.config.validate()?;
        self.observers.on_training_start(self.config.games)?;

        let mut total = Tally::default();
        let mut blocks = Vec::with_capacity(self.config.games.div_ceil(self.config.block_size));
        let mut block = Tally::default();

        for _ in 0..self.config.games {
            let outcome = engine.play_game_observed(opponent, &mut self.observers)?;
            total.record(outcome);
            block.record(outcome);
            if block.games() == self.config.block_size {
                blocks.push(std::mem::take(&mut block));
            }
        }
        if block.games() > 0 {
            blocks.push(block);
        }

        self.observers.on_training_end()?;

        Ok(TrainingReport {
            total,
            blocks,
            block_size: self.config.block_size,
            store: engine.store().stats(),
        })
    }
}
