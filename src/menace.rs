//! MENACE learning system
//!
//! Matchboxes, the store that owns them, the learning rule, the engine that
//! plays and learns, and the opponents it plays against.

pub mod engine;
pub mod matchbox;
pub mod opponent;
pub mod optimal;
pub mod reinforcement;
pub mod serialization;
pub mod store;

pub use engine::{Engine, EngineMove, EnginePhase, GameRecord, GameReport};
pub use matchbox::{MAX_BEADS, MIN_BEADS, Matchbox};
pub use opponent::{
    Opponent, OpponentKind, PerfectOpponent, RandomOpponent, ScriptedOpponent, SequentialOpponent,
};
pub use optimal::{OptimalPolicy, OptimalSolver};
pub use reinforcement::{Outcome, ReinforcementValues};
pub use serialization::{SavedMatchbox, SavedStore};
pub use store::{InitialBeadSchedule, MatchboxStore, StoreStats};
