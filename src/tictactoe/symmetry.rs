//! D4 symmetry group operations for board canonicalization
//!
//! Every transform reflects left-right first (when `reflection` is set) and
//! then rotates clockwise by `rotation` degrees. Position tables are built at
//! compile time so mapping a cell is a single lookup.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::board::{BoardState, Cell};

/// D4 symmetry transformation (dihedral group of the square)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct D4Transform {
    /// Rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,
    /// Whether to mirror across the vertical axis before rotating
    pub reflection: bool,
}

const fn build_table(quarter_turns: usize, reflection: bool) -> [usize; 9] {
    let mut table = [0usize; 9];
    let mut pos = 0;
    while pos < 9 {
        let mut row = pos / 3;
        let mut col = pos % 3;
        if reflection {
            col = 2 - col;
        }
        let mut turn = 0;
        while turn < quarter_turns {
            let next_row = col;
            col = 2 - row;
            row = next_row;
            turn += 1;
        }
        table[pos] = row * 3 + col;
        pos += 1;
    }
    table
}

/// Forward position tables indexed by [`D4Transform::index`]
const TABLES: [[usize; 9]; 8] = [
    build_table(0, false),
    build_table(0, true),
    build_table(1, false),
    build_table(1, true),
    build_table(2, false),
    build_table(2, true),
    build_table(3, false),
    build_table(3, true),
];

impl D4Transform {
    /// All eight transforms, identity first
    pub const ALL: [D4Transform; 8] = [
        D4Transform::new(0, false),
        D4Transform::new(0, true),
        D4Transform::new(90, false),
        D4Transform::new(90, true),
        D4Transform::new(180, false),
        D4Transform::new(180, true),
        D4Transform::new(270, false),
        D4Transform::new(270, true),
    ];

    const fn new(rotation: u16, reflection: bool) -> Self {
        D4Transform {
            rotation,
            reflection,
        }
    }

    /// Create identity transform
    pub const fn identity() -> Self {
        Self::new(0, false)
    }

    /// Position of this transform in [`D4Transform::ALL`]
    pub fn index(&self) -> usize {
        let quarter_turns = usize::from(self.rotation / 90) % 4;
        quarter_turns * 2 + usize::from(self.reflection)
    }

    pub fn is_identity(&self) -> bool {
        self.index() == 0
    }

    /// Where the cell at `pos` lands under this transform.
    ///
    /// `pos` must be a cell index in `0..9`; anything else panics.
    pub fn transform_position(&self, pos: usize) -> usize {
        debug_assert!(pos < 9, "cell index {pos} is off the board");
        TABLES[self.index()][pos]
    }

    /// Where the cell at `pos` came from before this transform
    pub fn apply_inverse_to_pos(&self, pos: usize) -> usize {
        self.inverse().transform_position(pos)
    }

    /// Apply transform to an array of cells
    pub fn apply_to_cells(&self, cells: &[Cell; 9]) -> [Cell; 9] {
        let table = &TABLES[self.index()];
        let mut out = [Cell::Empty; 9];
        for (idx, &cell) in cells.iter().enumerate() {
            out[table[idx]] = cell;
        }
        out
    }

    /// Get the inverse transform.
    ///
    /// Reflect-then-rotate is an involution whenever a reflection is
    /// involved; pure rotations invert by turning the other way.
    pub fn inverse(&self) -> D4Transform {
        if self.reflection {
            *self
        } else {
            D4Transform::new((360 - self.rotation % 360) % 360, false)
        }
    }

    /// The transform equivalent to applying `self` and then `then`
    pub fn compose(&self, then: &D4Transform) -> D4Transform {
        let first = &TABLES[self.index()];
        let second = &TABLES[then.index()];
        let combined: [usize; 9] = std::array::from_fn(|pos| second[first[pos]]);
        Self::ALL
            .into_iter()
            .find(|t| TABLES[t.index()] == combined)
            .unwrap_or_else(D4Transform::identity)
    }
}

impl Default for D4Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for D4Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reflection {
            write!(f, "reflect+rot{}", self.rotation)
        } else {
            write!(f, "rot{}", self.rotation)
        }
    }
}

impl BoardState {
    /// Apply a D4 transform to the board
    pub fn transform(&self, t: &D4Transform) -> Self {
        BoardState::from_cells_unchecked(t.apply_to_cells(self.cells()))
    }

    /// The canonical representative of this board's symmetry class
    pub fn canonical(&self) -> CanonicalState {
        canonicalize(self).state
    }

    /// Canonical form together with the transform that produced it
    pub fn canonical_context(&self) -> CanonicalContext {
        canonicalize(self)
    }
}

/// A board known to be the minimal image of its symmetry class.
///
/// Constructed only by [`canonicalize`] or by checked conversion, so every
/// value satisfies `canonicalize(s).state == s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardState", into = "BoardState")]
pub struct CanonicalState(BoardState);

impl CanonicalState {
    pub fn board(&self) -> &BoardState {
        &self.0
    }

    pub fn encode(&self) -> String {
        self.0.encode()
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        self.0.legal_moves()
    }
}

impl TryFrom<BoardState> for CanonicalState {
    type Error = crate::Error;

    fn try_from(board: BoardState) -> crate::Result<Self> {
        let ctx = canonicalize(&board);
        if ctx.state.0 == board {
            Ok(ctx.state)
        } else {
            Err(crate::Error::NonCanonicalState {
                state: board.encode(),
            })
        }
    }
}

impl From<CanonicalState> for BoardState {
    fn from(state: CanonicalState) -> Self {
        state.0
    }
}

impl FromStr for CanonicalState {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        CanonicalState::try_from(BoardState::from_string(s)?)
    }
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// The canonical form of a board plus the transform that reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalContext {
    /// The canonical board state
    pub state: CanonicalState,
    /// Maps original coordinates onto canonical coordinates
    pub transform: D4Transform,
}

impl CanonicalContext {
    /// Map a move from original coordinates to canonical coordinates
    pub fn map_move_to_canonical(&self, original_move: usize) -> usize {
        map_move_to_canonical(original_move, &self.transform)
    }

    /// Map a move from canonical coordinates back to original coordinates
    pub fn map_canonical_to_original(&self, canonical_move: usize) -> usize {
        map_move_from_canonical(canonical_move, &self.transform)
    }
}

/// Find the lexicographically smallest image of `board` under D4.
///
/// Cells compare as `Empty < X < O`. The search starts from the identity and
/// only replaces the best image with a strictly smaller one, so ties resolve
/// to the earliest transform in [`D4Transform::ALL`].
pub fn canonicalize(board: &BoardState) -> CanonicalContext {
    let mut best = *board;
    let mut best_transform = D4Transform::identity();

    for transform in D4Transform::ALL.into_iter().skip(1) {
        let image = board.transform(&transform);
        if image < best {
            best = image;
            best_transform = transform;
        }
    }

    CanonicalContext {
        state: CanonicalState(best),
        transform: best_transform,
    }
}

/// Cell `position` of the original board in canonical orientation.
///
/// Panics when `position` is not in `0..9`.
pub fn map_move_to_canonical(position: usize, transform: &D4Transform) -> usize {
    transform.transform_position(position)
}

/// Inverse of [`map_move_to_canonical`]; panics when `position` is not in `0..9`.
pub fn map_move_from_canonical(position: usize, transform: &D4Transform) -> usize {
    transform.apply_inverse_to_pos(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_leaves_positions_fixed() {
        let t = D4Transform::identity();
        for pos in 0..9 {
            assert_eq!(t.transform_position(pos), pos);
        }
    }

    #[test]
    fn quarter_turn_moves_corners_clockwise() {
        let t = D4Transform::new(90, false);
        assert_eq!(t.transform_position(0), 2);
        assert_eq!(t.transform_position(2), 8);
        assert_eq!(t.transform_position(8), 6);
        assert_eq!(t.transform_position(4), 4);
    }

    #[test]
    #[should_panic]
    fn off_board_cell_is_rejected() {
        map_move_to_canonical(9, &D4Transform::new(90, true));
    }

    #[test]
    fn reflection_mirrors_columns() {
        let t = D4Transform::new(0, true);
        assert_eq!(t.transform_position(0), 2);
        assert_eq!(t.transform_position(3), 5);
        assert_eq!(t.transform_position(7), 7);
    }

    #[test]
    fn every_transform_is_a_permutation_with_working_inverse() {
        for t in D4Transform::ALL {
            let mut seen = [false; 9];
            for pos in 0..9 {
                let image = t.transform_position(pos);
                assert!(!seen[image]);
                seen[image] = true;
                assert_eq!(t.apply_inverse_to_pos(image), pos);
            }
            assert!(t.compose(&t.inverse()).is_identity());
        }
    }

    #[test]
    fn compose_applies_left_then_right() {
        let quarter = D4Transform::new(90, false);
        let half = quarter.compose(&quarter);
        assert_eq!(half, D4Transform::new(180, false));
        let three = half.compose(&quarter);
        assert_eq!(three, D4Transform::new(270, false));
        assert!(three.compose(&quarter).is_identity());
    }

    #[test]
    fn corner_and_edge_openings_canonicalize_together() {
        let corners: Vec<_> = [0, 2, 6, 8]
            .iter()
            .map(|&p| BoardState::new().make_move(p).unwrap().canonical())
            .collect();
        assert!(corners.iter().all(|c| c.encode() == "........X"));

        let center = BoardState::new().make_move(4).unwrap().canonical();
        assert_eq!(center.encode(), "....X....");

        let edges: Vec<_> = [1, 3, 5, 7]
            .iter()
            .map(|&p| BoardState::new().make_move(p).unwrap().canonical())
            .collect();
        assert!(edges.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn empty_board_is_its_own_canonical_form() {
        let ctx = BoardState::new().canonical_context();
        assert_eq!(ctx.state.encode(), ".........");
        assert!(ctx.transform.is_identity());
    }

    #[test]
    fn context_maps_moves_both_ways() {
        let board = BoardState::from_string("X........").unwrap();
        let ctx = board.canonical_context();
        assert_eq!(board.transform(&ctx.transform), *ctx.state.board());
        for pos in board.legal_moves() {
            let canonical = ctx.map_move_to_canonical(pos);
            assert!(ctx.state.board().is_empty(canonical));
            assert_eq!(ctx.map_canonical_to_original(canonical), pos);
        }
    }

    #[test]
    fn non_canonical_board_is_rejected() {
        let board = BoardState::from_string("X........").unwrap();
        assert!(matches!(
            CanonicalState::try_from(board),
            Err(crate::Error::NonCanonicalState { .. })
        ));
        assert!("........X".parse::<CanonicalState>().is_ok());
    }
}
