//! Board module - the central state machine
//!
//! The board owns the locked grid, the falling piece (rotation cursor plus a
//! top-left offset), the next piece kind, the piece generator and the score.
//! Every move, rotation and spawn is tested with [`intersect`] against the
//! committed grid before anything is written, so the falling piece never
//! overlaps a locked cell.
//!
//! Coordinates: `x` grows to the right, `y` grows downward (row index). The
//! offset is the top-left corner of the shape matrix, so it may be negative
//! when the matrix has empty leading columns or rows.

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::kicks::{kick_offsets, KickOffset};
use crate::matrix::{check_removing, intersect, merge, ClearRow, Grid};
use crate::pieces::{default_shape, Shape};
use crate::rng::PieceGenerator;
use crate::rotation::RotationCursor;
use crate::scoring::Score;
use crate::snapshot::ViewData;
use crate::types::PieceKind;

/// Board-space offsets tried after every table kick has failed.
const FALLBACK_OFFSETS: [(i32, i32); 6] = [(-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1), (0, 1)];

/// Upper bound on rotation candidates (5 table kicks + fallbacks)
const MAX_CANDIDATES: usize = 5 + FALLBACK_OFFSETS.len();

/// How an accepted rotation was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationKick {
    /// Board-space translation applied (`dy` positive is down).
    pub offset: (i32, i32),
    /// True when the offset came from the wall-kick table rather than the fallback list.
    pub from_table: bool,
}

#[derive(Debug)]
pub struct Board {
    grid: Grid,
    cursor: RotationCursor,
    x: i32,
    y: i32,
    next: PieceKind,
    generator: Box<dyn PieceGenerator>,
    score: Score,
}

impl Board {
    /// Empty `rows x cols` board with the first piece already spawned.
    pub fn new(rows: usize, cols: usize, generator: Box<dyn PieceGenerator>) -> Self {
        Self::with_grid(Grid::new(rows, cols), generator)
    }

    /// Board over an existing grid (handy for setting up positions).
    ///
    /// Draws the current and the next piece and centers the current one at
    /// row 0. Whether that spawn collides can be checked with
    /// [`Board::collides`].
    pub fn with_grid(grid: Grid, mut generator: Box<dyn PieceGenerator>) -> Self {
        let current = generator.next_piece();
        let next = generator.next_piece();
        let mut board = Self {
            grid,
            cursor: RotationCursor::new(current),
            x: 0,
            y: 0,
            next,
            generator,
            score: Score::new(),
        };
        board.center_current();
        board
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn score_mut(&mut self) -> &mut Score {
        &mut self.score
    }

    pub fn current_kind(&self) -> PieceKind {
        self.cursor.kind()
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn orientation(&self) -> usize {
        self.cursor.orientation()
    }

    pub fn current_shape(&self) -> Shape {
        self.cursor.current_shape()
    }

    /// Top-left offset of the falling piece.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// True if the falling piece overlaps the grid where it stands.
    ///
    /// Only possible right after a spawn into a full board.
    pub fn collides(&self) -> bool {
        intersect(&self.grid, self.cursor.current_shape(), self.x, self.y)
    }

    pub fn move_down(&mut self) -> bool {
        self.try_translate(0, 1)
    }

    pub fn move_left(&mut self) -> bool {
        self.try_translate(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_translate(1, 0)
    }

    fn try_translate(&mut self, dx: i32, dy: i32) -> bool {
        let (x, y) = (self.x + dx, self.y + dy);
        if intersect(&self.grid, self.cursor.current_shape(), x, y) {
            return false;
        }
        self.x = x;
        self.y = y;
        trace!(x, y, "piece moved");
        true
    }

    /// Rotate clockwise with wall kicks; all-or-nothing.
    pub fn rotate(&mut self) -> bool {
        self.rotate_with_kick().is_some()
    }

    /// Rotate clockwise and report which correction made it fit.
    ///
    /// Table kicks are tried first (their `dy` flipped into row space), then
    /// [`FALLBACK_OFFSETS`]. Nothing changes when every candidate collides.
    pub fn rotate_with_kick(&mut self) -> Option<RotationKick> {
        let from = self.cursor.orientation();
        let (shape, to) = self.cursor.next_orientation();
        let class = self.cursor.kind().kick_class();

        let mut candidates: ArrayVec<RotationKick, MAX_CANDIDATES> = ArrayVec::new();
        for &(dx, dy) in kick_offsets(class, from as i32, to as i32).iter().take(5) {
            candidates.push(RotationKick {
                offset: table_to_board(dx, dy),
                from_table: true,
            });
        }
        for &offset in &FALLBACK_OFFSETS {
            candidates.push(RotationKick {
                offset,
                from_table: false,
            });
        }

        let kick = candidates.into_iter().find(|kick| {
            let (dx, dy) = kick.offset;
            !intersect(&self.grid, shape, self.x + dx, self.y + dy)
        })?;

        self.x += kick.offset.0;
        self.y += kick.offset.1;
        self.cursor.set_orientation(to as i32);
        trace!(from, to, ?kick, "piece rotated");
        Some(kick)
    }

    /// Would one more step down collide?
    pub fn is_grounded(&self) -> bool {
        intersect(&self.grid, self.cursor.current_shape(), self.x, self.y + 1)
    }

    /// Landing row for a hard drop from the current placement.
    ///
    /// `None` when the piece already overlaps the grid.
    pub fn ghost_y(&self) -> Option<i32> {
        let shape = self.cursor.current_shape();
        if intersect(&self.grid, shape, self.x, self.y) {
            return None;
        }
        let mut y = self.y;
        while !intersect(&self.grid, shape, self.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Promote the next piece and draw a fresh one.
    ///
    /// Returns true if the new piece collides at its spawn placement, which
    /// means the game is over.
    pub fn spawn_next(&mut self) -> bool {
        let kind = self.next;
        self.next = self.generator.next_piece();
        self.cursor.set_piece(kind);
        self.center_current();
        let collided = self.collides();
        debug!(?kind, next = ?self.next, x = self.x, collided, "piece spawned");
        collided
    }

    /// Install an externally supplied piece (hold swap), centered like a spawn.
    ///
    /// Returns true on collision.
    pub fn set_held_piece(&mut self, kind: PieceKind) -> bool {
        self.cursor.set_piece(kind);
        self.center_current();
        self.collides()
    }

    /// Stamp the falling piece into the grid at its committed offset.
    pub fn lock_current(&mut self) {
        self.grid = merge(&self.grid, self.cursor.current_shape(), self.x, self.y);
        debug!(kind = ?self.cursor.kind(), x = self.x, y = self.y, "piece locked");
    }

    /// Remove full rows and adopt the compacted grid.
    pub fn clear_lines(&mut self) -> ClearRow {
        let result = check_removing(&self.grid);
        if result.lines_removed > 0 {
            self.grid = result.new_matrix.clone();
            debug!(rows = ?result.cleared_rows, "lines cleared");
        }
        result
    }

    /// Empty grid, zeroed score (high score kept), fresh piece.
    ///
    /// Returns the spawn collision flag like [`Board::spawn_next`].
    pub fn reset_for_new_game(&mut self) -> bool {
        self.grid = Grid::new(self.grid.rows(), self.grid.cols());
        self.score.reset();
        self.spawn_next()
    }

    /// Read-only projection of the falling piece.
    pub fn current_snapshot(&self) -> ViewData {
        ViewData {
            kind: self.cursor.kind(),
            orientation: self.cursor.orientation(),
            shape: self.cursor.current_shape(),
            x: self.x,
            y: self.y,
            next_kind: self.next,
            next_shape: default_shape(self.next),
            ghost_y: self.ghost_y(),
        }
    }

    fn center_current(&mut self) {
        self.x = spawn_column(self.grid.cols(), self.cursor.current_shape().width());
        self.y = 0;
    }
}

/// `round((cols - width) / 2)`, halves rounding up, never negative.
pub fn spawn_column(cols: usize, shape_width: usize) -> i32 {
    let slack = cols as i32 - shape_width as i32;
    (slack + 1).div_euclid(2).max(0)
}

/// Table offsets are Y-up; the grid is Y-down.
fn table_to_board(dx: i32, dy: i32) -> KickOffset {
    (dx, -dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedGenerator;

    fn board_of(kind: PieceKind) -> Board {
        Board::new(25, 10, Box::new(ScriptedGenerator::repeat(kind)))
    }

    #[test]
    fn test_spawn_column_rounds_half_up() {
        assert_eq!(spawn_column(10, 4), 3);
        assert_eq!(spawn_column(10, 3), 4);
        assert_eq!(spawn_column(10, 2), 4);
        assert_eq!(spawn_column(2, 4), 0);
    }

    #[test]
    fn test_new_board_spawns_centered() {
        let board = board_of(PieceKind::T);
        assert_eq!(board.position(), (4, 0));
        assert_eq!(board.orientation(), 0);
        assert!(!board.collides());
    }

    #[test]
    fn test_translate_stops_at_walls() {
        let mut board = board_of(PieceKind::O);
        let mut moves = 0;
        while board.move_left() {
            moves += 1;
        }
        assert_eq!(moves, 4);
        assert_eq!(board.position(), (0, 0));
        assert!(!board.move_left());
        assert_eq!(board.position(), (0, 0));
    }

    #[test]
    fn test_ghost_matches_hard_drop() {
        let mut board = board_of(PieceKind::T);
        let ghost = board.ghost_y();
        while board.move_down() {}
        assert_eq!(ghost, Some(board.position().1));
        assert!(board.is_grounded());
    }

    #[test]
    fn test_square_rotation_is_a_no_op() {
        let mut board = board_of(PieceKind::O);
        let kick = board.rotate_with_kick();
        assert_eq!(
            kick,
            Some(RotationKick {
                offset: (0, 0),
                from_table: true
            })
        );
        assert_eq!(board.position(), (4, 0));
        assert_eq!(board.orientation(), 0);
    }

    #[test]
    fn test_lock_then_clear_replaces_grid() {
        let mut rows = vec![vec![1u8; 10]; 25];
        for row in rows.iter_mut().take(24) {
            row.fill(0);
        }
        rows[24][4] = 0;
        rows[24][5] = 0;
        rows[23].fill(1);
        rows[23][4] = 0;
        rows[23][5] = 0;
        let mut board = Board::with_grid(
            Grid::from_rows(&rows),
            Box::new(ScriptedGenerator::repeat(PieceKind::O)),
        );

        while board.move_down() {}
        board.lock_current();
        let result = board.clear_lines();
        assert_eq!(result.lines_removed, 2);
        assert_eq!(result.cleared_rows, vec![23, 24]);
        assert!(board.grid().is_empty());
    }

    #[test]
    fn test_reset_for_new_game_keeps_high_score() {
        let mut board = board_of(PieceKind::I);
        board.score_mut().add(300);
        while board.move_down() {}
        board.lock_current();

        assert!(!board.reset_for_new_game());
        assert!(board.grid().is_empty());
        assert_eq!(board.score().total(), 0);
        assert_eq!(board.score().high_score(), 300);
        assert_eq!(board.position(), (3, 0));
    }
}
