//! # Shape Module - Polyomino Geometry
//!
//! Pure geometric operations on polyominoes: quarter-turn rotation, the two
//! mirrors, and normalization back to the origin. Every operation returns a
//! new `Shape` and leaves its input untouched.
//!
//! ## Orientation Indexing
//! A piece has 8 orientations, numbered `0..8`:
//! ```text
//! index 0..4  -> base shape rotated `index` quarter turns
//! index 4..8  -> mirrored shape rotated `index - 4` quarter turns
//! ```
//! Symmetric pieces produce repeated orientations; that is harmless for the
//! legality engine and the move enumerator skips the repeats.

use std::fmt;

/// Number of orientations generated for every piece
pub const ORIENTATION_COUNT: usize = 8;

/// An integer grid position or offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this coordinate shifted by `(dx, dy)`
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One orientation of a polyomino, stored as block offsets
///
/// Blocks are unique. A normalized shape has its minimum x and minimum y at 0
/// and its blocks sorted by `(y, x)`, so two normalized shapes covering the
/// same cells compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    blocks: Vec<Coord>,
}

impl Shape {
    /// Builds a shape from `(x, y)` pairs
    pub fn from_offsets(offsets: &[(i32, i32)]) -> Self {
        Self {
            blocks: offsets.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
        }
    }

    pub fn blocks(&self) -> &[Coord] {
        &self.blocks
    }

    /// Number of unit squares in the shape
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Bounding box width (0 for an empty shape)
    pub fn width(&self) -> i32 {
        span(self.blocks.iter().map(|c| c.x))
    }

    /// Bounding box height (0 for an empty shape)
    pub fn height(&self) -> i32 {
        span(self.blocks.iter().map(|c| c.y))
    }

    /// Absolute cells covered when the shape is placed at `origin`
    pub fn cells_at(&self, origin: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.blocks.iter().map(move |b| b.offset(origin.x, origin.y))
    }

    /// One clockwise quarter turn about the origin: (x, y) -> (y, -x)
    pub fn rotate90(&self) -> Self {
        self.map(|c| Coord::new(c.y, -c.x))
    }

    /// (x, y) -> (-x, y)
    pub fn mirror_horizontal(&self) -> Self {
        self.map(|c| Coord::new(-c.x, c.y))
    }

    /// (x, y) -> (x, -y)
    pub fn mirror_vertical(&self) -> Self {
        self.map(|c| Coord::new(c.x, -c.y))
    }

    /// Translates the shape so that min x = 0 and min y = 0
    pub fn normalize(&self) -> Self {
        let (Some(min_x), Some(min_y)) = (
            self.blocks.iter().map(|c| c.x).min(),
            self.blocks.iter().map(|c| c.y).min(),
        ) else {
            return self.clone();
        };
        let mut blocks: Vec<Coord> = self
            .blocks
            .iter()
            .map(|c| Coord::new(c.x - min_x, c.y - min_y))
            .collect();
        blocks.sort_by_key(|c| (c.y, c.x));
        Self { blocks }
    }

    /// The normalized shape for orientation `index` (see module docs)
    ///
    /// Returns `None` for an index outside `0..ORIENTATION_COUNT`.
    pub fn orientation(&self, index: usize) -> Option<Self> {
        if index >= ORIENTATION_COUNT {
            return None;
        }
        let mut shape = if index >= 4 {
            self.mirror_horizontal()
        } else {
            self.clone()
        };
        for _ in 0..index % 4 {
            shape = shape.rotate90();
        }
        Some(shape.normalize())
    }

    /// All 8 normalized orientations, in index order, repeats included
    pub fn orientations(&self) -> Vec<Self> {
        (0..ORIENTATION_COUNT)
            .filter_map(|index| self.orientation(index))
            .collect()
    }

    fn map(&self, f: impl Fn(Coord) -> Coord) -> Self {
        Self {
            blocks: self.blocks.iter().copied().map(f).collect(),
        }
    }
}

fn span(values: impl Iterator<Item = i32>) -> i32 {
    let (min, max) = values.fold((i32::MAX, i32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max {
        0
    } else {
        max - min + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_tetromino() -> Shape {
        Shape::from_offsets(&[(0, 0), (1, 0), (2, 0), (2, 1)])
    }

    fn samples() -> Vec<Shape> {
        vec![
            Shape::from_offsets(&[(0, 0)]),
            Shape::from_offsets(&[(3, -2), (4, -2)]),
            l_tetromino(),
            Shape::from_offsets(&[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)]),
            Shape::from_offsets(&[(-5, 7), (-5, 8), (-4, 8), (-4, 9), (-3, 9)]),
        ]
    }

    #[test]
    fn test_rotate90_maps_coordinates() {
        let rotated = Shape::from_offsets(&[(1, 2), (3, 0)]).rotate90();
        assert_eq!(rotated.blocks(), &[Coord::new(2, -1), Coord::new(0, -3)]);
    }

    #[test]
    fn test_mirrors_map_coordinates() {
        let shape = Shape::from_offsets(&[(1, 2)]);
        assert_eq!(shape.mirror_horizontal().blocks(), &[Coord::new(-1, 2)]);
        assert_eq!(shape.mirror_vertical().blocks(), &[Coord::new(1, -2)]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for shape in samples() {
            let once = shape.normalize();
            assert_eq!(once.normalize(), once);
            assert_eq!(once.blocks().iter().map(|c| c.x).min(), Some(0));
            assert_eq!(once.blocks().iter().map(|c| c.y).min(), Some(0));
        }
    }

    #[test]
    fn test_normalize_empty_shape() {
        let empty = Shape::default();
        assert_eq!(empty.normalize(), empty);
        assert_eq!(empty.width(), 0);
    }

    #[test]
    fn test_four_rotations_return_to_start() {
        for shape in samples() {
            let turned = shape.rotate90().rotate90().rotate90().rotate90();
            assert_eq!(turned.normalize(), shape.normalize());
        }
    }

    #[test]
    fn test_mirrors_are_involutions() {
        for shape in samples() {
            assert_eq!(
                shape.mirror_horizontal().mirror_horizontal().normalize(),
                shape.normalize()
            );
            assert_eq!(
                shape.mirror_vertical().mirror_vertical().normalize(),
                shape.normalize()
            );
        }
    }

    #[test]
    fn test_orientations_cover_all_variants() {
        let shape = l_tetromino();
        let orientations = shape.orientations();
        assert_eq!(orientations.len(), ORIENTATION_COUNT);

        // Every rotate/mirror combination, including the vertical mirror used by
        // the original search, must appear among the 8 orientations.
        let mut variant = shape.clone();
        for _ in 0..4 {
            for candidate in [
                variant.clone(),
                variant.mirror_horizontal(),
                variant.mirror_vertical(),
                variant.mirror_horizontal().mirror_vertical(),
            ] {
                assert!(orientations.contains(&candidate.normalize()));
            }
            variant = variant.rotate90();
        }

        let mut distinct = orientations.clone();
        distinct.sort_by_key(|s| s.blocks().to_vec());
        distinct.dedup();
        assert_eq!(distinct.len(), 8, "L tetromino has 8 distinct orientations");
    }

    #[test]
    fn test_orientation_out_of_range() {
        assert!(l_tetromino().orientation(ORIENTATION_COUNT).is_none());
    }

    #[test]
    fn test_bounding_box() {
        let shape = l_tetromino();
        assert_eq!((shape.width(), shape.height()), (3, 2));
        let turned = shape.rotate90().normalize();
        assert_eq!((turned.width(), turned.height()), (2, 3));
    }
}
