//! Snapshot format for learned matchboxes
//!
//! A [`SavedStore`] captures everything needed to resume learning: the
//! engine's seat, its learning parameters and every matchbox opened so far.
//! States are stored in their compact 9-character encoding so the JSON form
//! stays readable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    engine::Engine,
    matchbox::Matchbox,
    reinforcement::ReinforcementValues,
    store::{InitialBeadSchedule, MatchboxStore},
};
use crate::{
    ports::DrawSource,
    tictactoe::{CanonicalState, Player},
};

/// One matchbox as written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMatchbox {
    /// Canonical state encoding, e.g. `"........X"`
    pub state: String,
    pub initial: u32,
    /// Canonical position to bead count
    pub beads: BTreeMap<usize, u32>,
}

/// Serializable snapshot of a trained engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStore {
    /// Version of the save format
    pub version: u32,
    pub seat: Player,
    pub initial_beads: InitialBeadSchedule,
    pub reinforcement: ReinforcementValues,
    pub games_played: u64,
    pub matchboxes: Vec<SavedMatchbox>,
}

impl SavedStore {
    /// Current save format version
    pub const VERSION: u32 = 1;

    /// Capture the engine's current state
    pub fn from_engine<D: DrawSource>(engine: &Engine<D>) -> Self {
        let matchboxes = engine
            .store()
            .iter()
            .map(|matchbox| SavedMatchbox {
                state: matchbox.state().encode(),
                initial: matchbox.initial_beads(),
                beads: matchbox.beads().collect(),
            })
            .collect();

        Self {
            version: Self::VERSION,
            seat: engine.seat(),
            initial_beads: *engine.store().schedule(),
            reinforcement: *engine.reinforcement(),
            games_played: engine.games_played(),
            matchboxes,
        }
    }

    /// Check the version and learning parameters
    ///
    /// # Errors
    ///
    /// [`crate::Error::UnsupportedSnapshotVersion`] for any version other
    /// than [`SavedStore::VERSION`], or a configuration error for invalid
    /// parameters.
    pub fn validate(&self) -> crate::Result<()> {
        if self.version != Self::VERSION {
            return Err(crate::Error::UnsupportedSnapshotVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        self.initial_beads.validate()?;
        self.reinforcement.validate()
    }

    /// Rebuild the matchbox store, validating every entry.
    ///
    /// Each state must parse, be canonical, not be finished and have the
    /// engine to move; each matchbox must cover exactly the state's empty
    /// cells with at least one bead each.
    pub fn to_store(&self) -> crate::Result<MatchboxStore> {
        self.validate()?;

        let mut store = MatchboxStore::new(self.initial_beads);
        for saved in &self.matchboxes {
            let state: CanonicalState = saved.state.parse()?;
            let board = state.board();
            if board.is_terminal() {
                return Err(crate::Error::GameOver);
            }
            if board.to_move() != self.seat {
                return Err(crate::Error::OutOfTurn {
                    expected: board.to_move(),
                    got: self.seat,
                });
            }
            store.insert(Matchbox::from_counts(
                state,
                saved.beads.clone(),
                saved.initial,
            )?);
        }
        Ok(store)
    }
}

impl<D: DrawSource> Engine<D> {
    /// Resume an engine from a snapshot, drawing moves from `draws`
    pub fn from_saved(saved: &SavedStore, draws: D) -> crate::Result<Self> {
        let store = saved.to_store()?;
        Ok(Engine::with_store(
            store,
            saved.seat,
            saved.reinforcement,
            draws,
            saved.games_played,
        ))
    }
}
