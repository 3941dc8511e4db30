//! Brickfall (workspace facade crate).
//!
//! Re-exports the member crates under one name: `brickfall::types` for the
//! shared vocabulary, `brickfall::core` for the rules engine and
//! `brickfall::adapter` for the command runtime and line protocol.

pub use brickfall_adapter as adapter;
pub use brickfall_core as core;
pub use brickfall_types as types;
