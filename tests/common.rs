//! Shared helpers for the integration tests.

use matchbox_menace::tictactoe::BoardState;
use proptest::prelude::*;

/// Play `choices` from the empty board, each one an index into the legal
/// moves of the position it is applied to. Stops early on a finished game.
pub fn play_indices(choices: &[usize]) -> BoardState {
    let mut board = BoardState::new();
    for &choice in choices {
        if board.is_terminal() {
            break;
        }
        let legal = board.legal_moves();
        board = board
            .make_move(legal[choice % legal.len()])
            .expect("legal move");
    }
    board
}

/// Any position reachable in legal play, finished or not
pub fn reachable_board() -> impl Strategy<Value = BoardState> {
    prop::collection::vec(0usize..9, 0..=9).prop_map(|choices| play_indices(&choices))
}
