//! Lazily populated collection of matchboxes keyed by canonical state

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    matchbox::{MAX_BEADS, MIN_BEADS, Matchbox},
    reinforcement::{Outcome, ReinforcementValues},
};
use crate::tictactoe::CanonicalState;

/// Initial bead counts by game stage.
///
/// The stage of a position is `min(marks_on_board / 2, 3)`, so a schedule of
/// `4,3,2,1` gives opening boxes four beads per move and late boxes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialBeadSchedule {
    pub per_stage: [u32; 4],
}

impl InitialBeadSchedule {
    /// Creates a new schedule, clamping values to `MIN_BEADS..=MAX_BEADS`.
    pub fn new(per_stage: [u32; 4]) -> Self {
        Self {
            per_stage: per_stage.map(|value| value.clamp(MIN_BEADS, MAX_BEADS)),
        }
    }

    /// Same count at every stage
    pub fn uniform(beads: u32) -> Self {
        Self::new([beads; 4])
    }

    /// Michie's 4/3/2/1 schedule
    pub fn michie() -> Self {
        Self::new([4, 3, 2, 1])
    }

    /// Initial beads for a position with `occupied` marks on the board
    pub fn beads_for(&self, occupied: usize) -> u32 {
        self.per_stage[(occupied / 2).min(3)]
    }

    pub fn is_uniform(&self) -> bool {
        self.per_stage.iter().all(|&n| n == self.per_stage[0])
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.per_stage.contains(&0) {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("initial bead schedule {self} contains a zero count"),
            });
        }
        if self.per_stage.iter().any(|&n| n > MAX_BEADS) {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("initial bead schedule {self} exceeds {MAX_BEADS} beads"),
            });
        }
        Ok(())
    }
}

impl Default for InitialBeadSchedule {
    fn default() -> Self {
        InitialBeadSchedule::uniform(3)
    }
}

impl fmt::Display for InitialBeadSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_uniform() {
            write!(f, "{}", self.per_stage[0])
        } else {
            let [a, b, c, d] = self.per_stage;
            write!(f, "{a},{b},{c},{d}")
        }
    }
}

impl FromStr for InitialBeadSchedule {
    type Err = crate::Error;

    /// Accepts one count (`"3"`) or four (`"4,3,2,1"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::new();
        for part in s
            .split([',', ';', ' ', '\t'])
            .filter(|token| !token.is_empty())
        {
            let value: u32 = part.parse().map_err(|_| crate::Error::ParseBeadSchedule {
                input: s.to_string(),
                reason: format!("'{part}' is not a bead count"),
            })?;
            if !(MIN_BEADS..=MAX_BEADS).contains(&value) {
                return Err(crate::Error::ParseBeadSchedule {
                    input: s.to_string(),
                    reason: format!("bead counts must lie in {MIN_BEADS}..={MAX_BEADS}"),
                });
            }
            values.push(value);
        }

        match values.as_slice() {
            &[n] => Ok(Self::uniform(n)),
            &[a, b, c, d] => Ok(Self::new([a, b, c, d])),
            other => Err(crate::Error::ParseBeadSchedule {
                input: s.to_string(),
                reason: format!("expected 1 or 4 values, got {}", other.len()),
            }),
        }
    }
}

/// Aggregate view of a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub matchboxes: usize,
    pub total_beads: u64,
    pub average_entropy: f64,
}

/// Every matchbox the engine has opened so far
#[derive(Debug, Clone, Default)]
pub struct MatchboxStore {
    boxes: HashMap<CanonicalState, Matchbox>,
    schedule: InitialBeadSchedule,
}

impl MatchboxStore {
    pub fn new(schedule: InitialBeadSchedule) -> Self {
        Self {
            boxes: HashMap::new(),
            schedule,
        }
    }

    pub fn schedule(&self) -> &InitialBeadSchedule {
        &self.schedule
    }

    /// Return the matchbox for `state`, opening it on first sight.
    ///
    /// A new box gets the scheduled bead count for every entry of
    /// `legal_moves`, which must be the empty cells of `state`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidMoves`] when `legal_moves` is empty.
    pub fn get_or_create(
        &mut self,
        state: CanonicalState,
        legal_moves: &[usize],
    ) -> crate::Result<&mut Matchbox> {
        if legal_moves.is_empty() {
            return Err(crate::Error::NoValidMoves);
        }
        debug_assert_eq!(legal_moves, state.legal_moves().as_slice());

        let initial = self.schedule.beads_for(state.board().occupied_count());
        Ok(self
            .boxes
            .entry(state)
            .or_insert_with(|| Matchbox::new(state, legal_moves, initial)))
    }

    pub fn get(&self, state: &CanonicalState) -> Option<&Matchbox> {
        self.boxes.get(state)
    }

    /// Apply the learning rule to one recorded move
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownMatchbox`] if `state` was never opened.
    pub fn reinforce(
        &mut self,
        state: &CanonicalState,
        position: usize,
        outcome: Outcome,
        values: &ReinforcementValues,
    ) -> crate::Result<u32> {
        self.boxes
            .get_mut(state)
            .ok_or_else(|| crate::Error::UnknownMatchbox {
                state: state.encode(),
            })?
            .reinforce(position, outcome, values)
    }

    /// Add a fully built matchbox, replacing any previous one for its state
    pub fn insert(&mut self, matchbox: Matchbox) {
        self.boxes.insert(*matchbox.state(), matchbox);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Matchboxes ordered by canonical state
    pub fn iter(&self) -> impl Iterator<Item = &Matchbox> {
        let mut boxes: Vec<&Matchbox> = self.boxes.values().collect();
        boxes.sort_by_key(|matchbox| *matchbox.state());
        boxes.into_iter()
    }

    pub fn stats(&self) -> StoreStats {
        let total_beads = self
            .boxes
            .values()
            .map(|matchbox| u64::from(matchbox.total_beads()))
            .sum();
        let average_entropy = if self.boxes.is_empty() {
            0.0
        } else {
            self.boxes.values().map(Matchbox::entropy).sum::<f64>() / self.boxes.len() as f64
        };

        StoreStats {
            matchboxes: self.boxes.len(),
            total_beads,
            average_entropy,
        }
    }

    /// Put every opened matchbox back to its initial counts
    pub fn reset(&mut self) {
        for matchbox in self.boxes.values_mut() {
            matchbox.reset();
        }
    }
}
