//! RNG module - piece generation
//!
//! A [`PieceGenerator`] hands out one piece kind per call. Three policies are
//! provided:
//!
//! - [`UniformGenerator`]: every kind equally likely on every call
//! - [`BagGenerator`]: the "7-bag", one of each kind per shuffled bag
//! - [`ScriptedGenerator`]: replays a fixed cycle, for tests and replays
//!
//! Randomness comes from a small LCG so a seed reproduces a whole game.

use std::fmt::Debug;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Source of upcoming pieces for a board.
pub trait PieceGenerator: Debug + Send {
    /// Produce the next piece kind.
    fn next_piece(&mut self) -> PieceKind;
}

/// Uniform random choice on every call
#[derive(Debug, Clone)]
pub struct UniformGenerator {
    rng: SimpleRng,
}

impl UniformGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl PieceGenerator for UniformGenerator {
    fn next_piece(&mut self) -> PieceKind {
        let index = self.rng.next_range(PieceKind::ALL.len() as u32) as usize;
        PieceKind::ALL[index]
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct BagGenerator {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: SimpleRng,
}

impl BagGenerator {
    /// Create a new bag generator with the given seed
    pub fn new(seed: u32) -> Self {
        let mut generator = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        generator.refill_bag();
        generator
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Pieces still waiting in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }
}

impl PieceGenerator for BagGenerator {
    fn next_piece(&mut self) -> PieceKind {
        // Ensure bag has pieces
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }
}

/// Replays a fixed sequence, wrapping around at the end
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    sequence: Vec<PieceKind>,
    index: usize,
}

impl ScriptedGenerator {
    /// # Panics
    ///
    /// Panics if `sequence` is empty.
    pub fn new(sequence: impl Into<Vec<PieceKind>>) -> Self {
        let sequence = sequence.into();
        assert!(!sequence.is_empty(), "scripted sequence must not be empty");
        Self { sequence, index: 0 }
    }

    /// A generator that only ever yields `kind`.
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl PieceGenerator for ScriptedGenerator {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.sequence[self.index];
        self.index = (self.index + 1) % self.sequence.len();
        piece
    }
}
