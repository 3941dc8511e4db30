//! Read-only projections handed to renderers and the runtime.

use crate::pieces::Shape;
use crate::types::{Cell, Difficulty, PieceKind};

/// The falling piece as a caller should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewData {
    pub kind: PieceKind,
    pub orientation: usize,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub next_kind: PieceKind,
    /// Spawn-orientation shape of the next piece.
    pub next_shape: Shape,
    /// Row the piece would land on if hard-dropped now.
    pub ghost_y: Option<i32>,
}

impl ViewData {
    /// Absolute grid positions of the falling piece's filled cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.cells().map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Absolute positions of the ghost cells, if a landing row is known.
    pub fn ghost_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let ghost_y = self.ghost_y;
        self.shape
            .cells()
            .filter_map(move |(dx, dy)| ghost_y.map(|gy| (self.x + dx, gy + dy)))
    }
}

/// Everything an external collaborator can query about one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Locked cells, `[rows][cols]`.
    pub grid: Vec<Vec<Cell>>,
    pub view: ViewData,
    pub held: Option<PieceKind>,
    pub can_hold: bool,
    pub score: u32,
    pub combo: u32,
    pub lines: u32,
    pub high_score: u32,
    pub paused: bool,
    pub game_over: bool,
    pub difficulty: Difficulty,
}

impl GameSnapshot {
    /// True when the game accepts movement and time.
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
