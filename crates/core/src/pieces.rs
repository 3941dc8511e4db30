//! Pieces module - the piece catalog
//!
//! Each piece kind owns an ordered list of shape matrices, one per
//! orientation, in clockwise order starting from the spawn orientation. Matrix
//! cells hold `0` or the kind's color tag, so stamping a shape into the grid
//! copies the tag directly.
//!
//! Bounding boxes follow the usual guideline layout: the I piece lives in a
//! 4x4 box, J/L/S/T/Z in 3x3 boxes and the O piece is a bare 2x2 square with a
//! single orientation.

use std::fmt;

use crate::types::{Cell, PieceKind, EMPTY};

/// One orientation of a piece: an immutable matrix of cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: &'static [&'static [Cell]],
}

impl Shape {
    const fn new(rows: &'static [&'static [Cell]]) -> Self {
        Self { rows }
    }

    /// Number of columns in the matrix (including empty ones).
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    /// Number of rows in the matrix (including empty ones).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// The raw matrix rows.
    pub fn rows(&self) -> &'static [&'static [Cell]] {
        self.rows
    }

    /// Cell at matrix position `(x, y)`, empty when outside the matrix.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(EMPTY)
    }

    /// Offsets `(dx, dy)` of the filled cells, row by row.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        self.filled().map(|(dx, dy, _)| (dx, dy))
    }

    /// Offsets and values of the filled cells.
    pub fn filled(self) -> impl Iterator<Item = (i32, i32, Cell)> {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &cell)| cell != EMPTY)
                .map(move |(x, &cell)| (x as i32, y as i32, cell))
        })
    }

    /// Copy into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows.iter().map(|row| row.to_vec()).collect()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.iter()).finish()
    }
}

/// Get the orientation list for a piece kind
pub fn orientations(kind: PieceKind) -> &'static [Shape] {
    match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::L => &L_SHAPES,
        PieceKind::O => &O_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::Z => &Z_SHAPES,
    }
}

/// Spawn-orientation shape, used for next/hold previews.
pub fn default_shape(kind: PieceKind) -> Shape {
    orientations(kind)[0]
}

/// I piece shapes
static I_SHAPES: [Shape; 4] = [
    Shape::new(&[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]]),
    Shape::new(&[&[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0]]),
    Shape::new(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0]]),
    Shape::new(&[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]]),
];

/// J piece shapes
static J_SHAPES: [Shape; 4] = [
    Shape::new(&[&[2, 0, 0], &[2, 2, 2], &[0, 0, 0]]),
    Shape::new(&[&[0, 2, 2], &[0, 2, 0], &[0, 2, 0]]),
    Shape::new(&[&[0, 0, 0], &[2, 2, 2], &[0, 0, 2]]),
    Shape::new(&[&[0, 2, 0], &[0, 2, 0], &[2, 2, 0]]),
];

/// L piece shapes
static L_SHAPES: [Shape; 4] = [
    Shape::new(&[&[0, 0, 3], &[3, 3, 3], &[0, 0, 0]]),
    Shape::new(&[&[0, 3, 0], &[0, 3, 0], &[0, 3, 3]]),
    Shape::new(&[&[0, 0, 0], &[3, 3, 3], &[3, 0, 0]]),
    Shape::new(&[&[3, 3, 0], &[0, 3, 0], &[0, 3, 0]]),
];

/// O piece shape (rotation never changes its footprint)
static O_SHAPES: [Shape; 1] = [Shape::new(&[&[4, 4], &[4, 4]])];

/// S piece shapes
static S_SHAPES: [Shape; 4] = [
    Shape::new(&[&[0, 5, 5], &[5, 5, 0], &[0, 0, 0]]),
    Shape::new(&[&[0, 5, 0], &[0, 5, 5], &[0, 0, 5]]),
    Shape::new(&[&[0, 0, 0], &[0, 5, 5], &[5, 5, 0]]),
    Shape::new(&[&[5, 0, 0], &[5, 5, 0], &[0, 5, 0]]),
];

/// T piece shapes
static T_SHAPES: [Shape; 4] = [
    Shape::new(&[&[0, 6, 0], &[6, 6, 6], &[0, 0, 0]]),
    Shape::new(&[&[0, 6, 0], &[0, 6, 6], &[0, 6, 0]]),
    Shape::new(&[&[0, 0, 0], &[6, 6, 6], &[0, 6, 0]]),
    Shape::new(&[&[0, 6, 0], &[6, 6, 0], &[0, 6, 0]]),
];

/// Z piece shapes
static Z_SHAPES: [Shape; 4] = [
    Shape::new(&[&[7, 7, 0], &[0, 7, 7], &[0, 0, 0]]),
    Shape::new(&[&[0, 0, 7], &[0, 7, 7], &[0, 7, 0]]),
    Shape::new(&[&[0, 0, 0], &[7, 7, 0], &[0, 7, 7]]),
    Shape::new(&[&[0, 7, 0], &[7, 7, 0], &[7, 0, 0]]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_orientation_has_four_cells_of_its_color() {
        for kind in PieceKind::ALL {
            for shape in orientations(kind) {
                let cells: Vec<_> = shape.filled().collect();
                assert_eq!(cells.len(), 4, "{kind:?} {shape:?}");
                assert!(cells.iter().all(|&(_, _, c)| c == kind.color()));
            }
        }
    }

    #[test]
    fn test_orientation_counts() {
        assert_eq!(orientations(PieceKind::O).len(), 1);
        for kind in [PieceKind::I, PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
            assert_eq!(orientations(kind).len(), 4);
        }
    }

    #[test]
    fn test_matrices_are_rectangular() {
        for kind in PieceKind::ALL {
            for shape in orientations(kind) {
                assert!(shape.rows().iter().all(|row| row.len() == shape.width()));
            }
        }
        assert_eq!(default_shape(PieceKind::I).width(), 4);
        assert_eq!(default_shape(PieceKind::T).width(), 3);
        assert_eq!(default_shape(PieceKind::O).width(), 2);
    }

    #[test]
    fn test_shape_get_outside_matrix_is_empty() {
        let t = default_shape(PieceKind::T);
        assert_eq!(t.get(1, 0), 6);
        assert_eq!(t.get(0, 0), 0);
        assert_eq!(t.get(5, 5), 0);
    }
}
