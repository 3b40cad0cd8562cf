//! # Board Module - Grid, Players and Hands
//!
//! The 20×20 board, the four fixed players with their starting corners, and
//! each player's hand of unplaced pieces.
//!
//! ## Ownership
//! The game controller is the only component that commits changes to a
//! `Board` or `Hands`. Everything else takes `&Board` / `&Hands`. The pure
//! `apply_move` in the crate root works on copies.
//!
//! ## Text Form
//! Boards print and parse as 20 lines of 20 characters: `.` for an empty cell
//! and `B`, `Y`, `R`, `G` for the players. Row 0 is the top line.

use crate::pieces::{self, PieceId, PIECE_COUNT};
use crate::shape::Coord;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Board width and height
pub const BOARD_SIZE: usize = 20;

/// The four players, in turn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    Blue,
    Yellow,
    Red,
    Green,
}

impl Player {
    pub const ALL: [Player; 4] = [Player::Blue, Player::Yellow, Player::Red, Player::Green];

    /// Position in turn order (0..4)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Player {
        Self::ALL[index % Self::ALL.len()]
    }

    /// The player who moves after this one
    pub fn next(self) -> Player {
        Self::from_index(self.index() + 1)
    }

    /// The board corner this player's first piece must cover
    pub fn start_corner(self) -> Coord {
        let far = BOARD_SIZE as i32 - 1;
        match self {
            Player::Blue => Coord::new(0, 0),
            Player::Yellow => Coord::new(far, 0),
            Player::Red => Coord::new(far, far),
            Player::Green => Coord::new(0, far),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::Blue => 'B',
            Player::Yellow => 'Y',
            Player::Red => 'R',
            Player::Green => 'G',
        }
    }

    pub fn from_symbol(c: char) -> Option<Player> {
        Self::ALL.into_iter().find(|p| p.symbol() == c.to_ascii_uppercase())
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Blue => "Blue",
            Player::Yellow => "Yellow",
            Player::Red => "Red",
            Player::Green => "Green",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The shared 20×20 grid
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Player>; BOARD_SIZE]; BOARD_SIZE],
    occupied: [usize; 4],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            occupied: [0; 4],
        }
    }

    pub fn in_bounds(pos: Coord) -> bool {
        (0..BOARD_SIZE as i32).contains(&pos.x) && (0..BOARD_SIZE as i32).contains(&pos.y)
    }

    /// Owner of the cell at `pos`; `None` if empty or out of bounds
    pub fn get(&self, pos: Coord) -> Option<Player> {
        if Self::in_bounds(pos) {
            self.cells[pos.y as usize][pos.x as usize]
        } else {
            None
        }
    }

    /// True when `pos` is on the board and empty
    pub fn is_empty_at(&self, pos: Coord) -> bool {
        Self::in_bounds(pos) && self.cells[pos.y as usize][pos.x as usize].is_none()
    }

    /// Number of cells owned by `player`
    pub fn occupied_count(&self, player: Player) -> usize {
        self.occupied[player.index()]
    }

    /// True when `player` has not placed anything yet
    pub fn is_first_move(&self, player: Player) -> bool {
        self.occupied_count(player) == 0
    }

    /// Iterates over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Player>; BOARD_SIZE]> {
        self.cells.iter()
    }

    /// Marks every cell in `cells` as owned by `player`
    ///
    /// Cells outside the board are ignored; cells already owned are
    /// overwritten. Callers check legality first.
    pub(crate) fn fill(&mut self, cells: impl IntoIterator<Item = Coord>, player: Player) {
        for pos in cells {
            if !Self::in_bounds(pos) {
                continue;
            }
            let cell = &mut self.cells[pos.y as usize][pos.x as usize];
            if let Some(previous) = cell.replace(player) {
                self.occupied[previous.index()] -= 1;
            }
            self.occupied[player.index()] += 1;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let c = cell.map(Player::symbol).unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {:?}", self.occupied)?;
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != BOARD_SIZE {
            return Err(format!("Expected {} rows, found {}", BOARD_SIZE, lines.len()));
        }
        let mut board = Board::new();
        for (y, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != BOARD_SIZE {
                return Err(format!(
                    "Row {} has {} cells, expected {}",
                    y,
                    chars.len(),
                    BOARD_SIZE
                ));
            }
            for (x, c) in chars.into_iter().enumerate() {
                if c == '.' {
                    continue;
                }
                let player =
                    Player::from_symbol(c).ok_or_else(|| format!("Bad cell '{}' at ({},{})", c, x, y))?;
                board.fill([Coord::new(x as i32, y as i32)], player);
            }
        }
        Ok(board)
    }
}

/// The pieces one player has not placed yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    pieces: BTreeSet<PieceId>,
}

impl Hand {
    /// A hand holding all 21 pieces
    pub fn full() -> Self {
        Self {
            pieces: PieceId::all().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            pieces: BTreeSet::new(),
        }
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Piece ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.iter().copied()
    }

    /// Total unit squares still in hand
    pub fn remaining_squares(&self) -> usize {
        self.iter().filter_map(pieces::get).map(|def| def.size()).sum()
    }

    pub(crate) fn remove(&mut self, id: PieceId) -> bool {
        self.pieces.remove(&id)
    }
}

impl FromIterator<PieceId> for Hand {
    fn from_iter<I: IntoIterator<Item = PieceId>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}

/// Every player's hand, indexed by `Player`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hands {
    hands: [Hand; 4],
}

impl Hands {
    /// All four players holding the full set
    pub fn full() -> Self {
        Self {
            hands: [Hand::full(), Hand::full(), Hand::full(), Hand::full()],
        }
    }

    pub fn from_hands(hands: [Hand; 4]) -> Self {
        Self { hands }
    }

    pub fn get(&self, player: Player) -> &Hand {
        &self.hands[player.index()]
    }

    pub(crate) fn get_mut(&mut self, player: Player) -> &mut Hand {
        &mut self.hands[player.index()]
    }

    /// Remaining-piece count per player, the game's score (lower is better)
    pub fn scores(&self) -> [usize; 4] {
        [
            self.hands[0].len(),
            self.hands[1].len(),
            self.hands[2].len(),
            self.hands[3].len(),
        ]
    }
}

impl Default for Hands {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_order_wraps() {
        assert_eq!(Player::Blue.next(), Player::Yellow);
        assert_eq!(Player::Green.next(), Player::Blue);
        assert_eq!(Player::from_index(6), Player::Red);
    }

    #[test]
    fn test_start_corners_are_distinct_board_corners() {
        let corners: BTreeSet<Coord> = Player::ALL.iter().map(|p| p.start_corner()).collect();
        assert_eq!(corners.len(), 4);
        for corner in corners {
            assert!(Board::in_bounds(corner));
            assert!(corner.x == 0 || corner.x == 19);
            assert!(corner.y == 0 || corner.y == 19);
        }
    }

    #[test]
    fn test_fill_tracks_occupancy() {
        let mut board = Board::new();
        assert!(board.is_first_move(Player::Red));
        board.fill([Coord::new(3, 4), Coord::new(4, 4), Coord::new(25, 4)], Player::Red);
        assert_eq!(board.occupied_count(Player::Red), 2);
        assert_eq!(board.get(Coord::new(4, 4)), Some(Player::Red));
        assert!(!board.is_empty_at(Coord::new(3, 4)));
        assert!(!board.is_empty_at(Coord::new(-1, 0)));

        board.fill([Coord::new(4, 4)], Player::Blue);
        assert_eq!(board.occupied_count(Player::Red), 1);
        assert_eq!(board.occupied_count(Player::Blue), 1);
    }

    #[test]
    fn test_text_round_trip() {
        let mut board = Board::new();
        board.fill([Coord::new(0, 0), Coord::new(19, 19)], Player::Blue);
        board.fill([Coord::new(19, 0)], Player::Yellow);
        let parsed: Board = board.to_string().parse().unwrap();
        assert_eq!(parsed, board);
        assert_eq!(parsed.occupied_count(Player::Blue), 2);
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        assert!("B.\n".parse::<Board>().is_err());
        let mut text = ".".repeat(BOARD_SIZE) + "\n";
        text = text.repeat(BOARD_SIZE - 1) + &"Q".repeat(BOARD_SIZE);
        assert!(text.parse::<Board>().is_err());
    }

    #[test]
    fn test_hand_scores() {
        let mut hands = Hands::full();
        assert_eq!(hands.scores(), [21; 4]);
        assert_eq!(hands.get(Player::Blue).remaining_squares(), 89);
        let monomino = PieceId::new(1).unwrap();
        assert!(hands.get_mut(Player::Green).remove(monomino));
        assert!(!hands.get_mut(Player::Green).remove(monomino));
        assert_eq!(hands.scores(), [21, 21, 21, 20]);
    }
}
