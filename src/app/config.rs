//! Configuration types for engine creation.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    menace::{Engine, InitialBeadSchedule, ReinforcementValues},
    tictactoe::Player,
};

/// Configuration for creating a MENACE engine.
///
/// Every field has a default, so a JSON file only needs the keys it wants
/// to change:
///
/// ```
/// use matchbox_menace::{app::EngineConfig, tictactoe::Player};
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "seat": "X", "seed": 7 }"#)?;
/// assert_eq!(config.seat, Player::X);
/// assert_eq!(config.reinforcement.win, 1);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Mark the engine plays; X always moves first
    pub seat: Player,
    /// Initial beads per legal move, by game stage
    pub initial_beads: InitialBeadSchedule,
    /// Bead deltas for win, draw and loss
    pub reinforcement: ReinforcementValues,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    /// Engine plays O with 3 beads per move, +1 on a win and -1 on a loss
    fn default() -> Self {
        Self {
            seat: Player::O,
            initial_beads: InitialBeadSchedule::default(),
            reinforcement: ReinforcementValues::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_seat(mut self, seat: Player) -> Self {
        self.seat = seat;
        self
    }

    pub fn with_initial_beads(mut self, beads: InitialBeadSchedule) -> Self {
        self.initial_beads = beads;
        self
    }

    pub fn with_reinforcement(mut self, values: ReinforcementValues) -> Self {
        self.reinforcement = values;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.initial_beads.validate()?;
        self.reinforcement.validate()
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| crate::Error::Io {
            operation: format!("open config {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Build a fresh engine with these settings
    pub fn build_engine(&self) -> crate::Result<Engine> {
        self.validate()?;
        Ok(Engine::seeded(
            self.seat,
            self.initial_beads,
            self.reinforcement,
            self.seed,
        ))
    }
}
