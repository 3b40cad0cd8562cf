//! # Rules Module - Placement Legality
//!
//! Decides whether a shape may be placed at a board origin for a player.
//! Checks run in this order and stop at the first failure:
//!
//! 1. every block is on the board
//! 2. every block lands on an empty cell
//! 3. first move: some block covers the player's starting corner (nothing
//!    else is checked)
//! 4. later moves: some block touches one of the player's cells diagonally
//! 5. later moves: no block shares an edge with one of the player's cells
//!
//! The board is only read. An illegal placement is reported as `false`.

use crate::board::{Board, Player};
use crate::shape::{Coord, Shape};

/// Diagonal neighbour offsets
pub const CORNER_OFFSETS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Orthogonal neighbour offsets
pub const EDGE_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Returns true if `shape` placed at `origin` is a legal move for `player`
pub fn is_legal_placement(board: &Board, shape: &Shape, origin: Coord, player: Player) -> bool {
    if shape.is_empty() {
        return false;
    }

    if !shape.cells_at(origin).all(|pos| board.is_empty_at(pos)) {
        return false;
    }

    if board.is_first_move(player) {
        let corner = player.start_corner();
        return shape.cells_at(origin).any(|pos| pos == corner);
    }

    let touches_corner = shape
        .cells_at(origin)
        .any(|pos| touches(board, pos, &CORNER_OFFSETS, player));
    if !touches_corner {
        return false;
    }

    !shape
        .cells_at(origin)
        .any(|pos| touches(board, pos, &EDGE_OFFSETS, player))
}

/// Counts (block, diagonal neighbour) pairs owned by `player`
///
/// A neighbour shared by two blocks is counted twice.
pub fn corner_touches(board: &Board, shape: &Shape, origin: Coord, player: Player) -> usize {
    shape
        .cells_at(origin)
        .map(|pos| {
            CORNER_OFFSETS
                .iter()
                .filter(|&&(dx, dy)| board.get(pos.offset(dx, dy)) == Some(player))
                .count()
        })
        .sum()
}

fn touches(board: &Board, pos: Coord, offsets: &[(i32, i32)], player: Player) -> bool {
    offsets
        .iter()
        .any(|&(dx, dy)| board.get(pos.offset(dx, dy)) == Some(player))
}
