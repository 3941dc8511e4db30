//! Adapter - drives the rules engine from outside collaborators
//!
//! The engine itself is synchronous and owns no clock. This crate puts it
//! behind a single serialized command channel on tokio and exposes it over a
//! **line-delimited JSON protocol**, so a renderer or bot in any language can
//! play through stdin/stdout or any other byte stream.
//!
//! # Message Types
//!
//! ## Client → Engine
//!
//! - **action**: one input command (`moveLeft`, `rotateCw`, `hardDrop`, `hold`, ...),
//!   optionally with a `side` in versus mode
//! - **advance**: pump game time by `ms` milliseconds
//! - **snapshot**: request the full state of every board
//! - **quit**: end the session
//!
//! ## Engine → Client
//!
//! - **update**: piece view, events and cleared rows after anything changed
//! - **snapshot**: grid, piece, hold, score counters and flags
//! - **error**: bad input, with a stable `code` and a message
//!
//! # Environment Variables
//!
//! - `BRICKFALL_ROWS` / `BRICKFALL_COLS`: board size (default 25 x 10)
//! - `BRICKFALL_DIFFICULTY`: `easy`, `medium` or `hard` (default medium)
//! - `BRICKFALL_LOCK_DELAY_MS`: lock delay (default 500)
//! - `BRICKFALL_LOCK_RESETS`: lock timer restarts per piece (default 15)
//! - `BRICKFALL_RANDOMIZER`: `uniform` or `bag` (default uniform)
//! - `BRICKFALL_SEED`: generator seed (default 1)
//! - `BRICKFALL_SCORING`: `compounding` or `multiplier` (default compounding)
//! - `BRICKFALL_TICK_MS`: internal clock interval, 0 to disable (default 16)
//! - `BRICKFALL_MAX_PENDING`: command channel capacity (default 64)
//! - `BRICKFALL_VERSUS`: set to "1" or "true" for two boards
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Engine: {"type":"action","action":"moveLeft"}
//! Engine -> Client: {"type":"update","changed":true,"piece":{"kind":"t","x":3,...},"events":[],"gameOver":false}
//! Client -> Engine: {"type":"action","action":"spin"}
//! Engine -> Client: {"type":"error","code":"unknown_action","message":"unknown action 'spin'"}
//! Client -> Engine: {"type":"quit"}
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use brickfall_types as types;

pub use config::RuntimeConfig;
pub use error::{ProtocolError, RuntimeError};
pub use protocol::{parse_request, Request, ServerMessage};
pub use runtime::{Command, GameRuntime, SideSnapshot, Update};
pub use server::serve;
