//! Rotation module - orientation bookkeeping for the falling piece
//!
//! The cursor only knows which piece kind is attached and which orientation
//! it is in. Board position and collision are the board's business.

use crate::pieces::{orientations, Shape};
use crate::types::PieceKind;

/// Current orientation of one piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationCursor {
    kind: PieceKind,
    orientation: usize,
}

impl RotationCursor {
    /// Attach a piece kind in its spawn orientation.
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            orientation: 0,
        }
    }

    /// Attach a new piece kind; orientation resets to 0.
    pub fn set_piece(&mut self, kind: PieceKind) {
        self.kind = kind;
        self.orientation = 0;
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn orientation(&self) -> usize {
        self.orientation
    }

    pub fn orientation_count(&self) -> usize {
        orientations(self.kind).len()
    }

    /// Shape at the current orientation.
    pub fn current_shape(&self) -> Shape {
        orientations(self.kind)[self.orientation]
    }

    /// Shape at any orientation; indices wrap in both directions.
    pub fn shape_at(&self, orientation: i32) -> Shape {
        orientations(self.kind)[self.normalize(orientation)]
    }

    /// Shape and index of the next clockwise orientation, without committing.
    pub fn next_orientation(&self) -> (Shape, usize) {
        let next = (self.orientation + 1) % self.orientation_count();
        (orientations(self.kind)[next], next)
    }

    /// Commit an orientation; indices wrap in both directions.
    pub fn set_orientation(&mut self, orientation: i32) {
        self.orientation = self.normalize(orientation);
    }

    fn normalize(&self, orientation: i32) -> usize {
        orientation.rem_euclid(self.orientation_count() as i32) as usize
    }
}
