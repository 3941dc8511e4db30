//! Matrix module - occupancy grids and the pure operations on them
//!
//! The grid is a `rows x cols` array of cells stored flat in row-major order
//! for cache locality. Coordinates: `(x, y)` where `x` is the column (left to
//! right) and `y` is the row (top to bottom). Row 0 is the spawn area.
//!
//! Grids have value semantics. Hypothetical placements are always tested
//! against a borrowed grid or a clone, never against aliased mutable state.

use crate::pieces::Shape;
use crate::types::{Cell, EMPTY, PIECE_KIND_COUNT};

/// A rectangular occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![EMPTY; rows * cols],
        }
    }

    /// Build a grid from nested rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows are ragged or a cell holds a value above the
    /// number of piece kinds.
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Self {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), cols, "ragged grid rows");
            assert!(
                row.iter().all(|&c| c <= PIECE_KIND_COUNT),
                "cell value out of range"
            );
            cells.extend_from_slice(row);
        }
        Self {
            rows: rows.len(),
            cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        debug_assert!(cell <= PIECE_KIND_COUNT);
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Borrow one row.
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Iterate rows from top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < self.rows && self.row(y).iter().all(|&c| c != EMPTY)
    }

    /// True when no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == EMPTY)
    }

    /// Export as nested rows (`[height][width]`).
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.iter_rows().map(<[Cell]>::to_vec).collect()
    }
}

/// Result of a full-row scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearRow {
    /// Number of rows removed.
    pub lines_removed: usize,
    /// Grid after removal and compaction.
    pub new_matrix: Grid,
    /// Informational bonus (`50 * lines^2`); the controller scores from the line table instead.
    pub score_bonus: u32,
    /// Removed row indices, strictly increasing.
    pub cleared_rows: Vec<usize>,
}

/// Deep copy of a grid.
pub fn copy(grid: &Grid) -> Grid {
    grid.clone()
}

/// Collision test: true if any filled cell of `shape`, placed with its
/// top-left corner at `(origin_x, origin_y)`, falls left of column 0, right of
/// the last column, below the floor, or onto an occupied cell.
///
/// Cells above row 0 never collide, so pieces may overlap the hidden region.
pub fn intersect(grid: &Grid, shape: Shape, origin_x: i32, origin_y: i32) -> bool {
    shape.cells().any(|(dx, dy)| {
        let x = origin_x + dx;
        let y = origin_y + dy;
        if x < 0 || x as usize >= grid.cols {
            return true;
        }
        if y < 0 {
            return false;
        }
        if y as usize >= grid.rows {
            return true;
        }
        grid.get(x, y) != Some(EMPTY)
    })
}

/// Stamp `shape` into a copy of `grid` and return it.
///
/// The placement must have been validated with [`intersect`]. Cells above
/// row 0 have nowhere to go and are dropped.
pub fn merge(grid: &Grid, shape: Shape, origin_x: i32, origin_y: i32) -> Grid {
    let mut merged = grid.clone();
    for (dx, dy, cell) in shape.filled() {
        let x = origin_x + dx;
        let y = origin_y + dy;
        if y < 0 {
            continue;
        }
        debug_assert_eq!(
            grid.get(x, y),
            Some(EMPTY),
            "merge at ({x}, {y}) is out of bounds or occupied"
        );
        merged.set(x, y, cell);
    }
    merged
}

/// Remove every full row at once.
///
/// Rows above a removed row shift down to fill the gap and the vacated rows at
/// the top are zero-filled. Works the same for zero, one or many full rows.
pub fn check_removing(grid: &Grid) -> ClearRow {
    let cols = grid.cols;
    let mut cleared_rows = Vec::new();
    let mut new_matrix = Grid::new(grid.rows, cols);
    let mut write_y = grid.rows;

    // Scan from bottom to top, compacting kept rows towards the floor
    for read_y in (0..grid.rows).rev() {
        if grid.is_row_full(read_y) {
            cleared_rows.push(read_y);
        } else {
            write_y -= 1;
            let dst = write_y * cols;
            new_matrix.cells[dst..dst + cols].copy_from_slice(grid.row(read_y));
        }
    }

    cleared_rows.reverse();
    let lines_removed = cleared_rows.len();

    ClearRow {
        lines_removed,
        new_matrix,
        score_bonus: 50 * (lines_removed * lines_removed) as u32,
        cleared_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::orientations;
    use crate::types::PieceKind;

    fn square() -> Shape {
        orientations(PieceKind::O)[0]
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(25, 10);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(9, 0), Some(9));
        assert_eq!(grid.index(0, 1), Some(10));
        assert_eq!(grid.index(9, 24), Some(249));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(10, 0), None);
        assert_eq!(grid.index(0, 25), None);
    }

    #[test]
    fn test_intersect_walls_and_floor() {
        let grid = Grid::new(6, 4);
        // O occupies its whole 2x2 box.
        assert!(!intersect(&grid, square(), 0, 0));
        assert!(!intersect(&grid, square(), 2, 4));
        assert!(intersect(&grid, square(), -1, 0));
        assert!(intersect(&grid, square(), 3, 0));
        assert!(intersect(&grid, square(), 0, 5));
    }

    #[test]
    fn test_intersect_ignores_cells_above_top() {
        let grid = Grid::new(6, 4);
        assert!(!intersect(&grid, square(), 0, -1));
        assert!(!intersect(&grid, square(), 0, -5));
        // Still bounded horizontally up there.
        assert!(intersect(&grid, square(), -1, -3));
    }

    #[test]
    fn test_merge_is_pure() {
        let grid = Grid::new(6, 4);
        let merged = merge(&grid, square(), 1, 4);
        assert!(grid.is_empty());
        assert_eq!(merged.get(1, 4), Some(PieceKind::O.color()));
        assert_eq!(merged.get(2, 5), Some(PieceKind::O.color()));
        assert_eq!(merged.get(0, 4), Some(EMPTY));
    }

    #[test]
    fn test_merge_drops_cells_above_top() {
        let grid = Grid::new(6, 4);
        let merged = merge(&grid, square(), 0, -1);
        assert_eq!(merged.get(0, 0), Some(PieceKind::O.color()));
        assert_eq!(merged.get(1, 0), Some(PieceKind::O.color()));
        assert_eq!(merged.get(0, 1), Some(EMPTY));
    }

    #[test]
    fn test_check_removing_bottom_row() {
        let mut rows = vec![vec![0u8; 4]; 5];
        rows[4] = vec![1, 2, 3, 4];
        rows[3] = vec![0, 5, 0, 0];
        let result = check_removing(&Grid::from_rows(&rows));

        assert_eq!(result.lines_removed, 1);
        assert_eq!(result.cleared_rows, vec![4]);
        assert_eq!(result.score_bonus, 50);
        assert_eq!(result.new_matrix.row(4), &[0, 5, 0, 0]);
        assert_eq!(result.new_matrix.row(0), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_iter_rows_matches_to_rows() {
        let grid = Grid::from_rows(&[[1u8, 0], [0, 2], [3, 3]]);
        assert_eq!(grid.iter_rows().count(), 3);
        assert_eq!(grid.to_rows(), vec![vec![1, 0], vec![0, 2], vec![3, 3]]);
    }
}
