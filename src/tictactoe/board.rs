//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// A cell on the noughts and crosses board.
///
/// The declaration order fixes the total order used by canonicalization:
/// `Empty < X < O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// Parse `x`/`o` (case-insensitive), also accepting `first`/`second`.
    pub fn parse(input: &str) -> crate::Result<Player> {
        match input.trim().to_ascii_lowercase().as_str() {
            "x" | "first" => Ok(Player::X),
            "o" | "second" => Ok(Player::O),
            _ => Err(crate::Error::ParsePlayer {
                input: input.to_string(),
            }),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Player::X => "X",
            Player::O => "O",
        })
    }
}

/// Result of inspecting a board for a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalStatus {
    Ongoing,
    XWins,
    OWins,
    Draw,
}

impl TerminalStatus {
    pub fn is_terminal(self) -> bool {
        self != TerminalStatus::Ongoing
    }

    /// The winning player, if the game ended with a line
    pub fn winner(self) -> Option<Player> {
        match self {
            TerminalStatus::XWins => Some(Player::X),
            TerminalStatus::OWins => Some(Player::O),
            TerminalStatus::Ongoing | TerminalStatus::Draw => None,
        }
    }
}

/// An immutable 3x3 board, row-major.
///
/// X always moves first, so the player to move is derived from the piece
/// counts instead of being stored. Every constructor enforces that X has
/// the same number of marks as O or exactly one more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[Cell; 9]", into = "[Cell; 9]")]
pub struct BoardState {
    cells: [Cell; 9],
}

/// Count of each piece type on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PieceCount {
    x: usize,
    o: usize,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
        }
    }

    /// Build a board from raw cells, validating turn parity and winners.
    ///
    /// # Errors
    ///
    /// Returns error if the piece counts are not `x == o` or `x == o + 1`,
    /// or if both players own a winning line.
    pub fn from_cells(cells: [Cell; 9]) -> crate::Result<Self> {
        let count = Self::count_pieces(&cells);
        if !(count.x == count.o || count.x == count.o + 1) {
            return Err(crate::Error::InvalidPieceCounts {
                x_count: count.x,
                o_count: count.o,
            });
        }

        let board = BoardState { cells };
        if board.has_won(Player::X) && board.has_won(Player::O) {
            return Err(crate::Error::ConflictingWinners {
                board: board.encode(),
            });
        }
        Ok(board)
    }

    /// Create a board from a string representation.
    ///
    /// Accepts the compact form produced by [`BoardState::encode`], e.g.
    /// `"XO......."`. Whitespace is ignored, so `"XO. ... ..."` also parses.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Anything other than exactly 9 cell characters remain
    /// - Any character is not a valid cell representation
    /// - The piece counts break X-first parity
    pub fn from_string(s: &str) -> crate::Result<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();

        if chars.len() != 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        Self::from_cells(cells)
    }

    /// Rebuild a board from cells already known to be a valid position,
    /// such as a symmetry image of an existing board.
    pub(super) fn from_cells_unchecked(cells: [Cell; 9]) -> Self {
        BoardState { cells }
    }

    fn count_pieces(cells: &[Cell; 9]) -> PieceCount {
        let mut count = PieceCount { x: 0, o: 0 };
        for cell in cells {
            match cell {
                Cell::X => count.x += 1,
                Cell::O => count.o += 1,
                Cell::Empty => {}
            }
        }
        count
    }

    /// The raw cells in row-major order
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// The player whose turn it is, derived from the piece counts
    pub fn to_move(&self) -> Player {
        let count = Self::count_pieces(&self.cells);
        if count.x == count.o {
            Player::X
        } else {
            Player::O
        }
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        let count = Self::count_pieces(&self.cells);
        count.x + count.o
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells.get(pos) == Some(&Cell::Empty)
    }

    /// All positions holding `Cell::Empty`, ascending.
    ///
    /// An empty result means the board is full.
    pub fn legal_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place `mark` at `position` and return the resulting board.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidPosition`] when `position > 8`
    /// - [`crate::Error::InvalidMove`] when the cell is occupied
    /// - [`crate::Error::GameOver`] when the board is already terminal
    /// - [`crate::Error::OutOfTurn`] when `mark` is not the player to move
    #[must_use = "apply_move returns a new board state; the original is unchanged"]
    pub fn apply_move(&self, position: usize, mark: Player) -> crate::Result<BoardState> {
        if position >= 9 {
            return Err(crate::Error::InvalidPosition { position });
        }
        if !self.is_empty(position) {
            return Err(crate::Error::InvalidMove { position });
        }
        if self.is_terminal() {
            return Err(crate::Error::GameOver);
        }
        let expected = self.to_move();
        if mark != expected {
            return Err(crate::Error::OutOfTurn {
                expected,
                got: mark,
            });
        }

        let mut next = *self;
        next.cells[position] = mark.to_cell();
        Ok(next)
    }

    /// Play `position` for the player to move
    #[must_use = "make_move returns a new board state; the original is unchanged"]
    pub fn make_move(&self, position: usize) -> crate::Result<BoardState> {
        self.apply_move(position, self.to_move())
    }

    /// Inspect the 8 winning lines and the remaining empty cells
    pub fn terminal_status(&self) -> TerminalStatus {
        if self.has_won(Player::X) {
            TerminalStatus::XWins
        } else if self.has_won(Player::O) {
            TerminalStatus::OWins
        } else if !self.cells.contains(&Cell::Empty) {
            TerminalStatus::Draw
        } else {
            TerminalStatus::Ongoing
        }
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.terminal_status().is_terminal()
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        self.terminal_status().winner()
    }

    /// Check if only a single move is available
    pub fn has_forced_move(&self) -> bool {
        !self.is_terminal() && self.legal_moves().len() == 1
    }

    /// Check if the player to move can complete a line right now
    pub fn has_immediate_win(&self) -> bool {
        LineAnalyzer::has_immediate_win(&self.cells, self.to_move())
    }

    /// Determine if the opponent currently threatens two winning moves
    pub fn opponent_has_double_threat(&self) -> bool {
        if self.has_immediate_win() {
            return false;
        }
        LineAnalyzer::winning_moves(&self.cells, self.to_move().opponent()).len() >= 2
    }

    /// Compact 9-character encoding, e.g. `"X...O...."`
    pub fn encode(&self) -> String {
        self.cells.iter().map(|&c| c.to_char()).collect()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<[Cell; 9]> for BoardState {
    type Error = crate::Error;

    fn try_from(cells: [Cell; 9]) -> crate::Result<Self> {
        Self::from_cells(cells)
    }
}

impl From<BoardState> for [Cell; 9] {
    fn from(board: BoardState) -> Self {
        board.cells
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            let rendered: Vec<String> = chunk
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => " ".to_string(),
                    other => other.to_char().to_string(),
                })
                .collect();
            write!(f, "{}", rendered.join(" | "))?;
            if row < 2 {
                writeln!(f)?;
                writeln!(f, "---------")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = BoardState::new();
        assert_eq!(board.to_move(), Player::X);
        assert_eq!(board.legal_moves(), (0..9).collect::<Vec<_>>());
        assert_eq!(board.terminal_status(), TerminalStatus::Ongoing);
    }

    #[test]
    fn test_make_move() {
        let board = BoardState::new();

        let new_board = board.make_move(4).unwrap();
        assert_eq!(new_board.get(4), Some(Cell::X));
        assert_eq!(new_board.to_move(), Player::O);

        // Move on occupied cell
        let err = new_board.make_move(4).unwrap_err();
        assert!(err.to_string().contains("occupied"));
    }

    #[test]
    fn apply_move_rejects_out_of_range_and_wrong_mark() {
        let board = BoardState::new();
        assert!(matches!(
            board.apply_move(9, Player::X),
            Err(crate::Error::InvalidPosition { position: 9 })
        ));
        assert!(matches!(
            board.apply_move(0, Player::O),
            Err(crate::Error::OutOfTurn {
                expected: Player::X,
                got: Player::O
            })
        ));
    }

    #[test]
    fn apply_move_rejects_finished_game() {
        let board = BoardState::from_string("XXXOO....").unwrap();
        assert!(matches!(
            board.apply_move(5, Player::O),
            Err(crate::Error::GameOver)
        ));
    }

    #[test]
    fn test_legal_moves() {
        let mut board = BoardState::new();
        board = board.make_move(0).unwrap();
        assert_eq!(board.legal_moves().len(), 8);
        assert!(!board.legal_moves().contains(&0));

        board = board.make_move(4).unwrap();
        assert_eq!(board.legal_moves().len(), 7);
        assert!(!board.legal_moves().contains(&4));
    }

    #[test]
    fn test_win_detection_horizontal() {
        let mut board = BoardState::new();
        for pos in [0, 3, 1, 4, 2] {
            board = board.make_move(pos).unwrap();
        }
        assert_eq!(board.terminal_status(), TerminalStatus::XWins);
        assert_eq!(board.winner(), Some(Player::X));
    }

    #[test]
    fn test_win_detection_vertical() {
        let mut board = BoardState::new();
        // O wins on middle column (1, 4, 7)
        for pos in [0, 1, 2, 4, 5, 7] {
            board = board.make_move(pos).unwrap();
        }
        assert_eq!(board.terminal_status(), TerminalStatus::OWins);
    }

    #[test]
    fn test_draw_detection() {
        let mut board = BoardState::new();
        for pos in [0, 1, 2, 4, 3, 6, 5, 8, 7] {
            board = board.make_move(pos).unwrap();
        }
        assert_eq!(board.terminal_status(), TerminalStatus::Draw);
        assert!(board.legal_moves().is_empty());
    }

    #[test]
    fn win_on_last_cell_is_not_a_draw() {
        // X completes the diagonal with the ninth mark
        let board = BoardState::from_string("XOXOXOOX.").unwrap();
        let finished = board.make_move(8).unwrap();
        assert_eq!(finished.terminal_status(), TerminalStatus::XWins);
    }

    #[test]
    fn test_from_string() {
        let board = BoardState::from_string("XOX......").unwrap();
        assert_eq!(board.get(0), Some(Cell::X));
        assert_eq!(board.get(1), Some(Cell::O));
        assert_eq!(board.to_move(), Player::O);

        assert!(BoardState::from_string("XO").is_err());
        assert!(BoardState::from_string("XOZ......").is_err());
    }

    #[test]
    fn from_string_rejects_trailing_cells() {
        assert!(matches!(
            BoardState::from_string("X........XXXXZZZ"),
            Err(crate::Error::InvalidBoardLength { expected: 9, got: 16, .. })
        ));
        assert!(BoardState::from_string("X... ...... ").is_err());
        assert!(BoardState::from_string("X.. ... ...").is_ok());
    }

    #[test]
    fn from_string_rejects_bad_parity() {
        assert!(matches!(
            BoardState::from_string("O........"),
            Err(crate::Error::InvalidPieceCounts { x_count: 0, o_count: 1 })
        ));
        assert!(BoardState::from_string("XX.......").is_err());
    }

    #[test]
    fn from_cells_rejects_two_winners() {
        let result = BoardState::from_string("XXXOOO...");
        assert!(matches!(result, Err(crate::Error::ConflictingWinners { .. })));
    }

    #[test]
    fn display_matches_grid_layout_and_parses_back() {
        let board = BoardState::from_string("X...O...X").unwrap();
        let rendered = board.to_string();
        assert_eq!(rendered, "X |   |  \n---------\n  | O |  \n---------\n  |   | X");
        assert_eq!(BoardState::from_string(&board.encode()).unwrap(), board);
    }

    #[test]
    fn test_encode() {
        let board = BoardState::from_string("XO.......").unwrap();
        assert_eq!(board.encode(), "XO.......");
        assert_eq!(BoardState::new().encode(), ".........");
    }

    #[test]
    fn cell_order_is_empty_x_o() {
        assert!(Cell::Empty < Cell::X);
        assert!(Cell::X < Cell::O);
    }

    #[test]
    fn double_threat_detection() {
        // X threatens 2 (top row) and 6 (left column); O cannot win at once
        let board = BoardState::from_string("XX.XO..O.").unwrap();
        assert_eq!(board.to_move(), Player::O);
        assert!(board.opponent_has_double_threat());
    }

    #[test]
    fn forced_move_detection() {
        let board = BoardState::from_string("XOXXOOOX.").unwrap();
        assert!(board.has_forced_move());
    }

    #[test]
    fn serde_rejects_invalid_cells() {
        let json = serde_json::to_string(&[Cell::O; 9]).unwrap();
        assert!(serde_json::from_str::<BoardState>(&json).is_err());

        let board = BoardState::from_string("X...O....").unwrap();
        let roundtrip: BoardState =
            serde_json::from_str(&serde_json::to_string(&board).unwrap()).unwrap();
        assert_eq!(roundtrip, board);
    }
}
