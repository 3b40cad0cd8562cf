//! # Piece Selection - Human Input Model
//!
//! Tracks the piece a human has picked up and how they have turned it.
//! `rotate` and `flip` act on the shape as currently shown, and the result is
//! always one of the piece's 8 indexed orientations, so a finished selection
//! maps straight onto a `(piece, orientation, origin)` request for the
//! controller.

use crate::board::{Board, Hand, Player};
use crate::game_controller::MoveValidationError;
use crate::movegen::PlacedMove;
use crate::pieces::{self, PieceId};
use crate::rules::is_legal_placement;
use crate::shape::{Coord, Shape};

/// A piece in hand, with its current orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSelection {
    piece: PieceId,
    orientation: usize,
}

/// What the board would look like under the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Cells the piece would cover (some may be off the board)
    pub cells: Vec<Coord>,
    /// Whether placing here is legal
    pub legal: bool,
}

impl PieceSelection {
    /// Picks up piece `raw_id` from `player`'s hand
    pub fn select(hand: &Hand, player: Player, raw_id: u8) -> Result<Self, MoveValidationError> {
        let piece = PieceId::new(raw_id).ok_or(MoveValidationError::UnknownPiece(raw_id))?;
        if !hand.contains(piece) {
            return Err(MoveValidationError::PieceNotInHand(piece, player));
        }
        Ok(Self::new(piece))
    }

    /// Selection of `piece` in its base orientation
    pub fn new(piece: PieceId) -> Self {
        Self {
            piece,
            orientation: 0,
        }
    }

    pub fn piece(&self) -> PieceId {
        self.piece
    }

    pub fn orientation(&self) -> usize {
        self.orientation
    }

    /// Quarter turn clockwise
    pub fn rotate(&mut self) {
        let (mirrored, turns) = self.split();
        self.orientation = mirrored + (turns + 1) % 4;
    }

    /// Mirror left-to-right as currently displayed
    pub fn flip(&mut self) {
        // Mirroring a turned shape equals turning the mirrored shape the
        // opposite way.
        let (mirrored, turns) = self.split();
        self.orientation = (4 - mirrored) + (4 - turns) % 4;
    }

    /// The normalized shape as currently oriented
    pub fn shape(&self) -> Shape {
        pieces::get(self.piece)
            .and_then(|def| def.shape().orientation(self.orientation))
            .unwrap_or_default()
    }

    /// Cells covered at `origin` and whether the placement is legal
    pub fn preview(&self, board: &Board, player: Player, origin: Coord) -> Preview {
        let shape = self.shape();
        Preview {
            cells: shape.cells_at(origin).collect(),
            legal: is_legal_placement(board, &shape, origin, player),
        }
    }

    /// The placement request for dropping the piece at `origin`
    pub fn to_move(&self, origin: Coord) -> Option<PlacedMove> {
        PlacedMove::new(self.piece, self.orientation, origin)
    }

    fn split(&self) -> (usize, usize) {
        (self.orientation / 4 * 4, self.orientation % 4)
    }
}
