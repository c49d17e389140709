//! Noughts and crosses rules, symmetry and state enumeration

pub mod board;
pub mod game_tree;
pub mod lines;
pub mod symmetry;

pub use board::{BoardState, Cell, Player, TerminalStatus};
pub use game_tree::{
    DecisionStateStats, StateFilter, analyze_decision_states, format_board,
    reachable_canonical_states, reachable_decision_states,
};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use symmetry::{
    CanonicalContext, CanonicalState, D4Transform, canonicalize, map_move_from_canonical,
    map_move_to_canonical,
};
