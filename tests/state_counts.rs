use matchbox_menace::tictactoe::{
    Player, StateFilter, analyze_decision_states, reachable_canonical_states,
    reachable_decision_states,
};

#[test]
fn there_are_765_canonical_positions() {
    let states = reachable_canonical_states();
    assert_eq!(states.len(), 765);
    assert!(states.iter().all(|state| state.board().canonical() == *state));
}

#[test]
fn first_mover_decision_states() {
    assert_eq!(reachable_decision_states(Player::X, StateFilter::All).len(), 338);
    assert_eq!(
        reachable_decision_states(Player::X, StateFilter::DecisionOnly).len(),
        304
    );
    assert_eq!(reachable_decision_states(Player::X, StateFilter::Michie).len(), 287);
}

#[test]
fn second_mover_decision_states() {
    assert_eq!(reachable_decision_states(Player::O, StateFilter::All).len(), 289);
    assert_eq!(
        reachable_decision_states(Player::O, StateFilter::DecisionOnly).len(),
        289
    );
    assert_eq!(reachable_decision_states(Player::O, StateFilter::Michie).len(), 234);
}

#[test]
fn decision_states_are_sorted_open_and_ours_to_move() {
    for seat in [Player::X, Player::O] {
        let states = reachable_decision_states(seat, StateFilter::All);
        assert!(states.windows(2).all(|pair| pair[0] < pair[1]));
        for state in &states {
            let board = state.board();
            assert!(!board.is_terminal(), "{state} is finished");
            assert_eq!(board.to_move(), seat);
            assert!(!state.legal_moves().is_empty());
        }
    }
}

#[test]
fn filters_are_nested() {
    for seat in [Player::X, Player::O] {
        let all = reachable_decision_states(seat, StateFilter::All);
        let decision = reachable_decision_states(seat, StateFilter::DecisionOnly);
        let michie = reachable_decision_states(seat, StateFilter::Michie);
        assert!(decision.iter().all(|state| all.contains(state)));
        assert!(michie.iter().all(|state| decision.contains(state)));
    }
}

#[test]
fn stats_add_up() {
    for seat in [Player::X, Player::O] {
        let stats = analyze_decision_states(seat);
        assert_eq!(stats.by_occupied.iter().sum::<usize>(), stats.total);
        assert_eq!(stats.forced + stats.double_threat + stats.michie, stats.total);
    }
    let x = analyze_decision_states(Player::X);
    assert_eq!(x.forced, 34);
    assert_eq!(x.by_occupied[0], 1);
    assert_eq!(x.by_occupied[2], 12);
    assert!(x.by_occupied.iter().skip(1).step_by(2).all(|&count| count == 0));
}
