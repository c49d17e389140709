//! Matchbox implementation for MENACE

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::reinforcement::{Outcome, ReinforcementValues};
use crate::{
    ports::DrawSource,
    tictactoe::CanonicalState,
    utils::{entropy_from_weights, weighted_sample},
};

/// No legal move ever holds fewer beads than this
pub const MIN_BEADS: u32 = 1;

/// No legal move ever holds more beads than this, so the nine moves of the
/// fullest box still total within `u32`.
pub const MAX_BEADS: u32 = u32::MAX / 9;

/// Beads for every legal move of one canonical state.
///
/// The key set is fixed at creation and always equals the state's empty
/// cells, in canonical orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchbox {
    state: CanonicalState,
    beads: BTreeMap<usize, u32>,
    initial: u32,
}

impl Matchbox {
    /// Fill a new matchbox with `initial` beads per legal move, clamped to
    /// `MIN_BEADS..=MAX_BEADS`
    pub fn new(state: CanonicalState, legal_moves: &[usize], initial: u32) -> Self {
        let initial = initial.clamp(MIN_BEADS, MAX_BEADS);
        Matchbox {
            state,
            beads: legal_moves.iter().map(|&pos| (pos, initial)).collect(),
            initial,
        }
    }

    /// Rebuild a matchbox from stored counts, checking them against the state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownMove`] when a key is not an empty cell,
    /// [`crate::Error::InvalidConfiguration`] when the keys miss a legal move
    /// or a count lies outside `MIN_BEADS..=MAX_BEADS`.
    pub fn from_counts(
        state: CanonicalState,
        beads: BTreeMap<usize, u32>,
        initial: u32,
    ) -> crate::Result<Self> {
        if let Some(&position) = beads.keys().find(|&&pos| !state.board().is_empty(pos)) {
            return Err(crate::Error::UnknownMove {
                state: state.encode(),
                position,
            });
        }
        if beads.len() != state.legal_moves().len() {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("matchbox {state} does not cover every legal move"),
            });
        }
        if let Some((&position, &count)) = beads
            .iter()
            .find(|&(_, &count)| !(MIN_BEADS..=MAX_BEADS).contains(&count))
        {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "matchbox {state} holds {count} beads for position {position}, \
                     allowed range is {MIN_BEADS}..={MAX_BEADS}"
                ),
            });
        }
        Ok(Matchbox {
            state,
            beads,
            initial: initial.clamp(MIN_BEADS, MAX_BEADS),
        })
    }

    pub fn state(&self) -> &CanonicalState {
        &self.state
    }

    /// Bead count each move started with
    pub fn initial_beads(&self) -> u32 {
        self.initial
    }

    /// Get the bead count for a specific position
    pub fn bead_count(&self, position: usize) -> Option<u32> {
        self.beads.get(&position).copied()
    }

    /// Position and bead count pairs in ascending position order
    pub fn beads(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.beads.iter().map(|(&pos, &count)| (pos, count))
    }

    pub fn moves(&self) -> impl Iterator<Item = usize> + '_ {
        self.beads.keys().copied()
    }

    pub fn total_beads(&self) -> u32 {
        self.beads.values().sum()
    }

    /// Draw a move with probability proportional to its beads.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyMatchbox`] if the box holds no beads.
    pub fn select_move<D>(&self, draws: &mut D) -> crate::Result<usize>
    where
        D: DrawSource + ?Sized,
    {
        let items: Vec<(usize, u32)> = self.beads().collect();
        weighted_sample(draws, &items).ok_or_else(|| crate::Error::EmptyMatchbox {
            state: self.state.encode(),
        })
    }

    /// Change the beads at `position` by `delta`, saturating at
    /// [`MIN_BEADS`] and [`MAX_BEADS`]. Returns the new count.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownMove`] when `position` is not a key.
    pub fn adjust(&mut self, position: usize, delta: i32) -> crate::Result<u32> {
        let count = self
            .beads
            .get_mut(&position)
            .ok_or_else(|| crate::Error::UnknownMove {
                state: self.state.encode(),
                position,
            })?;

        let updated = (i64::from(*count) + i64::from(delta))
            .clamp(i64::from(MIN_BEADS), i64::from(MAX_BEADS));
        *count = u32::try_from(updated).unwrap_or(MAX_BEADS);
        Ok(*count)
    }

    /// Apply the learning rule for `outcome` to the move at `position`
    pub fn reinforce(
        &mut self,
        position: usize,
        outcome: Outcome,
        values: &ReinforcementValues,
    ) -> crate::Result<u32> {
        self.adjust(position, values.delta(outcome))
    }

    /// Shannon entropy of the move distribution
    pub fn entropy(&self) -> f64 {
        entropy_from_weights(self.beads.values().map(|&count| f64::from(count)))
    }

    /// Restore every move to the initial count
    pub fn reset(&mut self) {
        for count in self.beads.values_mut() {
            *count = self.initial;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::ScriptedDraws, tictactoe::BoardState};

    fn corner_box(initial: u32) -> Matchbox {
        let state = BoardState::from_string("X........").unwrap().canonical();
        Matchbox::new(state, &state.legal_moves(), initial)
    }

    #[test]
    fn new_box_is_uniform_over_legal_moves() {
        let matchbox = corner_box(3);
        assert_eq!(matchbox.moves().collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
        assert!(matchbox.beads().all(|(_, count)| count == 3));
        assert_eq!(matchbox.total_beads(), 24);
    }

    #[test]
    fn zero_initial_is_raised_to_floor() {
        assert_eq!(corner_box(0).initial_beads(), MIN_BEADS);
    }

    #[test]
    fn select_move_follows_ticket() {
        let mut matchbox = corner_box(1);
        matchbox.adjust(5, 2).unwrap();
        // tickets 0..5 map to 0..4, tickets 5..8 map to 5
        let mut draws = ScriptedDraws::new(vec![6]);
        assert_eq!(matchbox.select_move(&mut draws).unwrap(), 5);
        let mut draws = ScriptedDraws::new(vec![8]);
        assert_eq!(matchbox.select_move(&mut draws).unwrap(), 6);
    }

    #[test]
    fn reinforcement_respects_floor() {
        let values = ReinforcementValues::new(3, 0, -5);
        let mut matchbox = corner_box(3);

        assert_eq!(matchbox.reinforce(0, Outcome::EngineWin, &values).unwrap(), 6);
        assert_eq!(matchbox.reinforce(1, Outcome::EngineLoss, &values).unwrap(), 1);
        assert_eq!(matchbox.reinforce(1, Outcome::EngineLoss, &values).unwrap(), 1);
        assert_eq!(matchbox.reinforce(2, Outcome::Draw, &values).unwrap(), 3);
    }

    #[test]
    fn huge_wins_saturate_and_box_stays_drawable() {
        let values = ReinforcementValues::new(i32::MAX, 0, -1);
        let mut matchbox = corner_box(3);
        for pos in 0..8 {
            for _ in 0..3 {
                matchbox.reinforce(pos, Outcome::EngineWin, &values).unwrap();
            }
        }
        assert!(matchbox.beads().all(|(_, count)| count == MAX_BEADS));
        assert_eq!(matchbox.total_beads(), 8 * MAX_BEADS);

        let mut draws = ScriptedDraws::new(vec![8 * MAX_BEADS - 1]);
        assert_eq!(matchbox.select_move(&mut draws).unwrap(), 7);
        assert!(matchbox.entropy() > 2.0);
    }

    #[test]
    fn unknown_position_is_rejected() {
        let mut matchbox = corner_box(3);
        assert!(matches!(
            matchbox.adjust(8, 1),
            Err(crate::Error::UnknownMove { position: 8, .. })
        ));
    }

    #[test]
    fn reset_restores_initial_counts() {
        let mut matchbox = corner_box(2);
        matchbox.adjust(3, 10).unwrap();
        matchbox.reset();
        assert_eq!(matchbox.bead_count(3), Some(2));
    }

    #[test]
    fn entropy_drops_as_one_move_dominates() {
        let mut matchbox = corner_box(3);
        let uniform = matchbox.entropy();
        matchbox.adjust(4, 50).unwrap();
        assert!(matchbox.entropy() < uniform);
    }

    #[test]
    fn from_counts_validates_keys_and_floor() {
        let state = BoardState::from_string("X........").unwrap().canonical();
        let good: BTreeMap<usize, u32> = (0..8).map(|p| (p, 2)).collect();
        assert!(Matchbox::from_counts(state, good.clone(), 3).is_ok());

        let mut overfull = good.clone();
        overfull.insert(0, MAX_BEADS + 1);
        assert!(Matchbox::from_counts(state, overfull, 3).is_err());

        let mut occupied = good.clone();
        occupied.insert(8, 1);
        assert!(Matchbox::from_counts(state, occupied, 3).is_err());

        let mut zero = good;
        zero.insert(0, 0);
        assert!(Matchbox::from_counts(state, zero, 3).is_err());
    }
}
