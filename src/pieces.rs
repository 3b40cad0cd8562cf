//! # Piece Catalog
//!
//! The 21 Blokus pieces: one monomino, one domino, two trominoes, five
//! tetrominoes and twelve pentominoes. Ids run from 1 to 21 in catalog order.
//!
//! The catalog is a static table. Orientation lists are derived from it once,
//! on first use, and shared by every move search afterwards.

use crate::shape::{Shape, ORIENTATION_COUNT};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Number of pieces each player starts with
pub const PIECE_COUNT: usize = 21;

/// Identifier of a catalog piece (1..=21)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u8);

impl PieceId {
    /// Returns `None` unless `id` names a catalog piece
    pub fn new(id: u8) -> Option<Self> {
        (1..=PIECE_COUNT as u8).contains(&id).then_some(Self(id))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every piece id in catalog order
    pub fn all() -> impl Iterator<Item = PieceId> {
        (1..=PIECE_COUNT as u8).map(PieceId)
    }

    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PieceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return PieceId::new(n).ok_or_else(|| format!("No piece with id {}", n));
        }
        CATALOG
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(s))
            .map(|def| def.id)
            .ok_or_else(|| format!("Unknown piece '{}'", s))
    }
}

/// An immutable catalog entry
#[derive(Debug)]
pub struct PieceDefinition {
    pub id: PieceId,
    pub name: &'static str,
    offsets: &'static [(i32, i32)],
}

impl PieceDefinition {
    /// The piece's base shape, normalized
    pub fn shape(&self) -> Shape {
        Shape::from_offsets(self.offsets).normalize()
    }

    /// Number of unit squares
    pub fn size(&self) -> usize {
        self.offsets.len()
    }
}

macro_rules! piece {
    ($id:expr, $name:expr, [$(($x:expr, $y:expr)),+ $(,)?]) => {
        PieceDefinition {
            id: PieceId($id),
            name: $name,
            offsets: &[$(($x, $y)),+],
        }
    };
}

/// The full piece table, in id order
pub static CATALOG: [PieceDefinition; PIECE_COUNT] = [
    piece!(1, "I1", [(0, 0)]),
    piece!(2, "I2", [(0, 0), (1, 0)]),
    piece!(3, "I3", [(0, 0), (1, 0), (2, 0)]),
    piece!(4, "L3", [(0, 0), (1, 0), (1, 1)]),
    piece!(5, "I4", [(0, 0), (1, 0), (2, 0), (3, 0)]),
    piece!(6, "L4", [(0, 0), (1, 0), (2, 0), (2, 1)]),
    piece!(7, "T4", [(0, 0), (1, 0), (2, 0), (1, 1)]),
    piece!(8, "O4", [(0, 0), (1, 0), (0, 1), (1, 1)]),
    piece!(9, "S4", [(1, 0), (2, 0), (0, 1), (1, 1)]),
    piece!(10, "I5", [(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]),
    piece!(11, "L5", [(0, 0), (1, 0), (2, 0), (3, 0), (3, 1)]),
    piece!(12, "Y5", [(0, 0), (1, 0), (2, 0), (3, 0), (1, 1)]),
    piece!(13, "N5", [(0, 0), (1, 0), (2, 0), (2, 1), (3, 1)]),
    piece!(14, "P5", [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]),
    piece!(15, "U5", [(0, 0), (1, 0), (0, 1), (2, 0), (2, 1)]),
    piece!(16, "V5", [(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]),
    piece!(17, "W5", [(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)]),
    piece!(18, "Z5", [(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)]),
    piece!(19, "F5", [(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)]),
    piece!(20, "T5", [(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)]),
    piece!(21, "X5", [(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]),
];

/// Looks up a catalog entry
pub fn get(id: PieceId) -> Option<&'static PieceDefinition> {
    CATALOG.get(id.index()).filter(|def| def.id == id)
}

/// Geometrically distinct orientations of a piece, tagged with their index
///
/// An orientation equal to an earlier one is left out; the survivor keeps
/// the lowest index, so indices stay meaningful to `Shape::orientation`.
pub fn distinct_orientations(id: PieceId) -> &'static [(usize, Shape)] {
    static TABLE: OnceLock<Vec<Vec<(usize, Shape)>>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        CATALOG
            .iter()
            .map(|def| {
                let mut seen: Vec<(usize, Shape)> = Vec::with_capacity(ORIENTATION_COUNT);
                for (index, shape) in def.shape().orientations().into_iter().enumerate() {
                    if !seen.iter().any(|(_, s)| *s == shape) {
                        seen.push((index, shape));
                    }
                }
                seen
            })
            .collect()
    });
    table.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
}
