//! Core game logic - pure, deterministic, and testable
//!
//! This crate is the rules engine: grid, falling piece, rotation with wall
//! kicks, collision, line clearing and combo scoring. It has **no
//! dependencies** on rendering, input devices or I/O, and holds no clock:
//! callers pump elapsed time and input commands in and read snapshots out.
//!
//! # Module Structure
//!
//! - [`matrix`]: occupancy grids and the pure copy / intersect / merge / row-removal operations
//! - [`pieces`]: the seven piece kinds and their orientation matrices
//! - [`rotation`]: orientation cursor for the falling piece
//! - [`kicks`]: wall-kick offset tables keyed by `"from>to"`
//! - [`rng`]: seedable piece generators (uniform, 7-bag, scripted)
//! - [`board`]: the central state machine (move, rotate, spawn, lock, clear)
//! - [`scoring`]: point total, combo streak, lines and high score
//! - [`snapshot`]: read-only view data for renderers
//! - [`controller`]: gravity, lock delay, hold, pause and game over
//! - [`versus`]: two independent controllers side by side
//! - [`config`]: game configuration with reference defaults
//!
//! # Example
//!
//! ```
//! use brickfall_core::{GameConfig, GameController};
//! use brickfall_types::GameAction;
//!
//! let mut game = GameController::new(GameConfig::default().with_seed(12345));
//!
//! game.apply(GameAction::MoveRight);
//! game.apply(GameAction::RotateCw);
//! let outcome = game.apply(GameAction::HardDrop);
//! assert!(outcome.changed);
//!
//! // Gravity: one step per 400ms on the default difficulty
//! let before = game.view().y;
//! game.advance(400);
//! assert_eq!(game.view().y, before + 1);
//! ```

pub mod board;
pub mod config;
pub mod controller;
pub mod kicks;
pub mod matrix;
pub mod pieces;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod snapshot;
pub mod versus;

pub use brickfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, RotationKick};
pub use config::{GameConfig, Randomizer};
pub use controller::{GameController, GameEvent, Phase, StepOutcome};
pub use matrix::{ClearRow, Grid};
pub use pieces::Shape;
pub use rng::{BagGenerator, PieceGenerator, ScriptedGenerator, SimpleRng, UniformGenerator};
pub use rotation::RotationCursor;
pub use scoring::{Score, ScoringRule};
pub use snapshot::{GameSnapshot, ViewData};
pub use versus::{Side, Versus};
