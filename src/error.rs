//! Error types for the MENACE crate

use thiserror::Error;

use crate::tictactoe::Player;

/// Main error type for the MENACE crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: usize },

    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("game already over")]
    GameOver,

    #[error("out of turn: {expected:?} is to move, got a mark for {got:?}")]
    OutOfTurn { expected: Player, got: Player },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("matchbox for state '{state}' holds no beads")]
    EmptyMatchbox { state: String },

    #[error("no matchbox exists for state '{state}'")]
    UnknownMatchbox { state: String },

    #[error("matchbox for state '{state}' has no beads for position {position}")]
    UnknownMove { state: String, position: usize },

    #[error("opponent chose illegal position {position} on board '{board}'")]
    IllegalOpponentMove { position: usize, board: String },

    #[error("wrong board length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid piece counts: X={x_count}, O={o_count} (X moves first, so X must equal O or lead by 1)")]
    InvalidPieceCounts { x_count: usize, o_count: usize },

    #[error("both players have a winning line in '{board}'")]
    ConflictingWinners { board: String },

    #[error("state '{state}' is not in canonical form")]
    NonCanonicalState { state: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid game count '{input}' (expected a non-negative integer)")]
    ParseGameCount { input: String },

    #[error("invalid player '{input}' (expected 'x' or 'o')")]
    ParsePlayer { input: String },

    #[error("invalid bead schedule '{input}': {reason}")]
    ParseBeadSchedule { input: String, reason: String },

    #[error("invalid reinforcement values '{input}': {reason}")]
    ParseReinforcement { input: String, reason: String },

    #[error("invalid state filter '{input}'. Expected one of: {expected}")]
    ParseStateFilter { input: String, expected: String },

    #[error("invalid opponent '{input}'. Expected one of: {expected}")]
    ParseOpponent { input: String, expected: String },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
