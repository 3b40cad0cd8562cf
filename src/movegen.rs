//! # Move Generation
//!
//! Exhaustive search over a player's hand: every piece, every distinct
//! orientation, every one of the 400 board origins. Pieces are searched in
//! parallel on the rayon pool; results keep the order
//! (piece id, orientation index, y, x).
//!
//! Worst case a full query runs 21 × 8 × 400 = 67,200 legality checks, so the
//! controller caches the boolean answer per player until the board changes.

use crate::board::{Board, Hand, Player, BOARD_SIZE};
use crate::pieces::{self, PieceId};
use crate::rules::is_legal_placement;
use crate::shape::{Coord, Shape};
use rayon::prelude::*;
use std::fmt;

/// A fully specified placement: which piece, which orientation, where
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlacedMove {
    pub piece: PieceId,
    pub orientation: usize,
    /// The oriented, normalized shape
    pub shape: Shape,
    /// Board position of the shape's (0, 0) offset
    pub origin: Coord,
}

impl PlacedMove {
    /// Resolves a piece/orientation/origin triple against the catalog
    ///
    /// Returns `None` for an unknown piece or an orientation outside `0..8`.
    pub fn new(piece: PieceId, orientation: usize, origin: Coord) -> Option<Self> {
        let shape = pieces::get(piece)?.shape().orientation(orientation)?;
        Some(Self {
            piece,
            orientation,
            shape,
            origin,
        })
    }

    /// Absolute board cells this move covers
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.shape.cells_at(self.origin)
    }

    /// Number of blocks placed
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Key that orders moves the way the enumerator produces them
    pub fn sort_key(&self) -> (PieceId, usize, i32, i32) {
        (self.piece, self.orientation, self.origin.y, self.origin.x)
    }
}

impl fmt::Display for PlacedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = pieces::get(self.piece).map(|def| def.name).unwrap_or("?");
        write!(f, "{}/{}@{}", name, self.orientation, self.origin)
    }
}

/// Every legal move for `player` with the pieces in `hand`
pub fn all_legal_moves(board: &Board, hand: &Hand, player: Player) -> Vec<PlacedMove> {
    let ids: Vec<PieceId> = hand.iter().collect();
    let per_piece: Vec<Vec<PlacedMove>> = ids
        .par_iter()
        .map(|&id| piece_moves(board, id, player))
        .collect();
    per_piece.into_iter().flatten().collect()
}

/// True if `player` can place at least one piece from `hand`
///
/// Stops at the first legal placement found. An empty hand has no moves.
pub fn has_any_legal_move(board: &Board, hand: &Hand, player: Player) -> bool {
    let ids: Vec<PieceId> = hand.iter().collect();
    ids.par_iter().any(|&id| {
        resolve(id).iter().any(|(_, shape)| {
            origins().any(|origin| is_legal_placement(board, shape, origin, player))
        })
    })
}

fn piece_moves(board: &Board, id: PieceId, player: Player) -> Vec<PlacedMove> {
    let mut moves = Vec::new();
    for (orientation, shape) in resolve(id) {
        for origin in origins() {
            if is_legal_placement(board, shape, origin, player) {
                moves.push(PlacedMove {
                    piece: id,
                    orientation: *orientation,
                    shape: shape.clone(),
                    origin,
                });
            }
        }
    }
    moves
}

fn resolve(id: PieceId) -> &'static [(usize, Shape)] {
    let orientations = pieces::distinct_orientations(id);
    if orientations.is_empty() {
        // The catalog is fixed; a miss here is a bug in the caller.
        tracing::error!(piece = %id, "piece id missing from catalog, skipping");
        debug_assert!(false, "piece {} missing from catalog", id);
    }
    orientations
}

/// Board origins, row by row
fn origins() -> impl Iterator<Item = Coord> {
    let size = BOARD_SIZE as i32;
    (0..size).flat_map(move |y| (0..size).map(move |x| Coord::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hand;

    fn hand_of(ids: &[u8]) -> Hand {
        ids.iter().filter_map(|&n| PieceId::new(n)).collect()
    }

    #[test]
    fn test_empty_hand_has_no_moves() {
        let board = Board::new();
        assert!(!has_any_legal_move(&board, &Hand::empty(), Player::Blue));
        assert!(all_legal_moves(&board, &Hand::empty(), Player::Blue).is_empty());
    }

    #[test]
    fn test_opening_monomino_has_one_move() {
        let moves = all_legal_moves(&Board::new(), &hand_of(&[1]), Player::Red);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].origin, Player::Red.start_corner());
    }

    #[test]
    fn test_opening_moves_cover_the_corner() {
        let board = Board::new();
        let moves = all_legal_moves(&board, &Hand::full(), Player::Green);
        assert!(!moves.is_empty());
        for mv in &moves {
            assert!(mv.cells().any(|c| c == Player::Green.start_corner()));
            assert!(is_legal_placement(&board, &mv.shape, mv.origin, Player::Green));
        }
        // Domino: horizontal or vertical, each with one placement at the corner.
        let dominoes = moves.iter().filter(|m| m.piece.get() == 2).count();
        assert_eq!(dominoes, 2);
    }

    #[test]
    fn test_moves_come_out_sorted() {
        let moves = all_legal_moves(&Board::new(), &Hand::full(), Player::Blue);
        let keys: Vec<_> = moves.iter().map(PlacedMove::sort_key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_boolean_and_exhaustive_forms_agree() {
        let board: Board = concat!(
            "BB..................\n",
            "B...................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
            "....................\n",
        )
        .parse()
        .unwrap();
        for player in Player::ALL {
            let hand = hand_of(&[1, 5, 19]);
            assert_eq!(
                has_any_legal_move(&board, &hand, player),
                !all_legal_moves(&board, &hand, player).is_empty()
            );
        }
    }

    #[test]
    fn test_placed_move_resolution() {
        let id = PieceId::new(10).unwrap();
        let mv = PlacedMove::new(id, 1, Coord::new(3, 3)).unwrap();
        assert_eq!((mv.shape.width(), mv.shape.height()), (1, 5));
        assert_eq!(mv.size(), 5);
        assert!(PlacedMove::new(id, 8, Coord::new(0, 0)).is_none());
        assert_eq!(mv.to_string(), "I5/1@(3,3)");
    }
}
