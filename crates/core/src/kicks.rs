//! Kicks module - wall kick data for rotations
//!
//! Each transition `from>to` between orientations maps to an ordered list of
//! `(dx, dy)` offsets. The first offset whose placement does not collide wins.
//! Offsets use the guideline convention where positive `dy` means *up*; the
//! board negates `dy` before applying it to its row-indexed space.
//!
//! Reference: https://tetris.wiki/SRS

use std::fmt;

use tracing::warn;

use crate::types::KickClass;

/// Candidate position correction `(dx, dy)`, positive `dy` is up.
pub type KickOffset = (i32, i32);

/// Orientations the tables are authored for.
const TABLE_ORIENTATIONS: i32 = 4;

/// Offset used when no correction is available.
static NO_KICK: [KickOffset; 1] = [(0, 0)];

/// A rotation transition, displayed as `"from>to"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: u8,
    pub to: u8,
}

impl Transition {
    /// Build a transition, wrapping both orientations into `0..4`.
    pub fn new(from: i32, to: i32) -> Self {
        Self {
            from: from.rem_euclid(TABLE_ORIENTATIONS) as u8,
            to: to.rem_euclid(TABLE_ORIENTATIONS) as u8,
        }
    }

    /// Table key for orientations already in `0..4`.
    const fn at(from: u8, to: u8) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.from, self.to)
    }
}

struct KickEntry {
    key: Transition,
    offsets: [KickOffset; 5],
}

/// JLSTZ kick table (shared by J, L, S, T, Z)
static STANDARD_KICKS: [KickEntry; 8] = [
    KickEntry { key: Transition::at(0, 1), offsets: [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)] },
    KickEntry { key: Transition::at(1, 0), offsets: [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)] },
    KickEntry { key: Transition::at(1, 2), offsets: [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)] },
    KickEntry { key: Transition::at(2, 1), offsets: [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)] },
    KickEntry { key: Transition::at(2, 3), offsets: [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)] },
    KickEntry { key: Transition::at(3, 2), offsets: [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)] },
    KickEntry { key: Transition::at(3, 0), offsets: [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)] },
    KickEntry { key: Transition::at(0, 3), offsets: [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)] },
];

/// I piece kick table (reaches further than JLSTZ)
static LONG_KICKS: [KickEntry; 8] = [
    KickEntry { key: Transition::at(0, 1), offsets: [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)] },
    KickEntry { key: Transition::at(1, 0), offsets: [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)] },
    KickEntry { key: Transition::at(1, 2), offsets: [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)] },
    KickEntry { key: Transition::at(2, 1), offsets: [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)] },
    KickEntry { key: Transition::at(2, 3), offsets: [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)] },
    KickEntry { key: Transition::at(3, 2), offsets: [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)] },
    KickEntry { key: Transition::at(3, 0), offsets: [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)] },
    KickEntry { key: Transition::at(0, 3), offsets: [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)] },
];

/// Get the kick candidates for a rotation transition.
///
/// The square class always yields the single no-op offset. A transition the
/// table does not know (e.g. `0>2`) degrades to the no-op offset as well.
pub fn kick_offsets(class: KickClass, from: i32, to: i32) -> &'static [KickOffset] {
    let table: &'static [KickEntry] = match class {
        KickClass::Square => return &NO_KICK,
        KickClass::Long => &LONG_KICKS,
        KickClass::Standard => &STANDARD_KICKS,
    };

    let transition = Transition::new(from, to);
    match table.iter().find(|entry| entry.key == transition) {
        Some(entry) => &entry.offsets,
        None => {
            warn!(?class, %transition, "no wall kick entry for transition; using no-op offset");
            &NO_KICK
        }
    }
}
