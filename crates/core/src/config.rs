//! Game configuration
//!
//! Plain data; every field has a reference default. Environment parsing lives
//! in the runtime crate, the core only consumes a finished value.

use crate::rng::{BagGenerator, PieceGenerator, UniformGenerator};
use crate::scoring::ScoringRule;
use crate::types::{Difficulty, BOARD_COLS, BOARD_ROWS, LOCK_DELAY_MS, LOCK_RESET_LIMIT};

/// Which [`PieceGenerator`] a new game draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Randomizer {
    /// Uniform choice on every draw.
    #[default]
    Uniform,
    /// Shuffled bags of all seven kinds.
    Bag,
}

impl Randomizer {
    /// Parse from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uniform" | "random" => Some(Randomizer::Uniform),
            "bag" | "7bag" | "7-bag" => Some(Randomizer::Bag),
            _ => None,
        }
    }

    /// Build a generator of this kind.
    pub fn build(self, seed: u32) -> Box<dyn PieceGenerator> {
        match self {
            Randomizer::Uniform => Box::new(UniformGenerator::new(seed)),
            Randomizer::Bag => Box::new(BagGenerator::new(seed)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub difficulty: Difficulty,
    pub lock_delay_ms: u32,
    /// Lock timer restarts allowed per piece while grounded.
    pub lock_reset_limit: u8,
    pub randomizer: Randomizer,
    pub seed: u32,
    pub scoring: ScoringRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: BOARD_ROWS,
            cols: BOARD_COLS,
            difficulty: Difficulty::default(),
            lock_delay_ms: LOCK_DELAY_MS,
            lock_reset_limit: LOCK_RESET_LIMIT,
            randomizer: Randomizer::default(),
            seed: 1,
            scoring: ScoringRule::default(),
        }
    }
}

impl GameConfig {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Generator for a fresh game under this config.
    pub fn generator(&self) -> Box<dyn PieceGenerator> {
        self.randomizer.build(self.seed)
    }
}
