//! Enumeration of reachable positions under D4 symmetry reduction

use std::{
    collections::{BTreeSet, HashSet, VecDeque},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::{BoardState, CanonicalState, Player};

/// Which decision states deserve a matchbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateFilter {
    /// Every non-terminal state where the seat is to move
    #[default]
    All,
    /// Drop states with exactly one legal move
    DecisionOnly,
    /// Michie's reduction: also drop states already lost to a double threat
    Michie,
}

impl StateFilter {
    pub const VARIANTS: &'static str = "all, decision-only, michie";

    /// Whether a non-terminal state with the seat to move passes the filter
    pub fn admits(self, board: &BoardState) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::DecisionOnly => !board.has_forced_move(),
            StateFilter::Michie => !board.has_forced_move() && !board.opponent_has_double_threat(),
        }
    }
}

impl FromStr for StateFilter {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StateFilter::All),
            "decision-only" | "decision" => Ok(StateFilter::DecisionOnly),
            "michie" => Ok(StateFilter::Michie),
            _ => Err(crate::Error::ParseStateFilter {
                input: s.to_string(),
                expected: Self::VARIANTS.to_string(),
            }),
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StateFilter::All => "all",
            StateFilter::DecisionOnly => "decision-only",
            StateFilter::Michie => "michie",
        })
    }
}

/// Breadth-first walk over every board reachable from the empty board,
/// calling `visit` once per distinct raw position (terminal ones included).
fn walk_reachable(mut visit: impl FnMut(&BoardState)) {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    let root = BoardState::new();
    visited.insert(root);
    queue.push_back(root);

    while let Some(state) = queue.pop_front() {
        visit(&state);
        if state.is_terminal() {
            continue;
        }
        for pos in state.legal_moves() {
            let Ok(next) = state.make_move(pos) else {
                continue;
            };
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
}

/// Every canonical position reachable in legal play, terminal ones included.
///
/// This is the classic 765-state enumeration.
pub fn reachable_canonical_states() -> BTreeSet<CanonicalState> {
    let mut states = BTreeSet::new();
    walk_reachable(|board| {
        states.insert(board.canonical());
    });
    states
}

/// Canonical non-terminal positions where `seat` is to move and `filter`
/// admits the position, sorted by the canonical cell order.
pub fn reachable_decision_states(seat: Player, filter: StateFilter) -> Vec<CanonicalState> {
    reachable_canonical_states()
        .into_iter()
        .filter(|state| {
            let board = state.board();
            !board.is_terminal() && board.to_move() == seat && filter.admits(board)
        })
        .collect()
}

/// Summary of the decision-state space for one seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionStateStats {
    pub seat: Player,
    /// Non-terminal states with `seat` to move
    pub total: usize,
    /// Count per number of marks already on the board
    pub by_occupied: [usize; 9],
    /// States with a single legal move
    pub forced: usize,
    /// Non-forced states already lost to an opponent double threat
    pub double_threat: usize,
    /// States admitted by [`StateFilter::Michie`]
    pub michie: usize,
}

/// Break down the decision states for `seat`
pub fn analyze_decision_states(seat: Player) -> DecisionStateStats {
    let mut stats = DecisionStateStats {
        seat,
        total: 0,
        by_occupied: [0; 9],
        forced: 0,
        double_threat: 0,
        michie: 0,
    };

    for state in reachable_decision_states(seat, StateFilter::All) {
        let board = state.board();
        stats.total += 1;
        stats.by_occupied[board.occupied_count()] += 1;

        if board.has_forced_move() {
            stats.forced += 1;
        } else if board.opponent_has_double_threat() {
            stats.double_threat += 1;
        } else {
            stats.michie += 1;
        }
    }

    stats
}

/// Render a 9-character encoding as `"XXX / OO. / ..."`
pub fn format_board(encoding: &str) -> Option<String> {
    let chars: Vec<char> = encoding.chars().collect();
    if chars.len() != 9 {
        return None;
    }
    let rows: Vec<String> = chars.chunks(3).map(|row| row.iter().collect()).collect();
    Some(rows.join(" / "))
}
