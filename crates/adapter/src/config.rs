//! Runtime configuration read from `BRICKFALL_*` environment variables.
//!
//! Unset or unparsable values fall back to the defaults.

use std::env;
use std::str::FromStr;

use brickfall_core::{GameConfig, Randomizer, ScoringRule};

use crate::types::{Difficulty, TICK_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Interval of the internal clock; 0 disables it (time only moves on `advance`).
    pub tick_ms: u32,
    /// Capacity of the serialized command channel.
    pub max_pending_commands: usize,
    /// Run two independent boards.
    pub versus: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            tick_ms: TICK_MS,
            max_pending_commands: 64,
            versus: false,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] over any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let game = GameConfig {
            rows: parse(var("BRICKFALL_ROWS"))
                .filter(|&rows: &usize| rows >= 4)
                .unwrap_or(defaults.game.rows),
            cols: parse(var("BRICKFALL_COLS"))
                .filter(|&cols: &usize| cols >= 4)
                .unwrap_or(defaults.game.cols),
            difficulty: var("BRICKFALL_DIFFICULTY")
                .and_then(|s| Difficulty::from_str(&s))
                .unwrap_or(defaults.game.difficulty),
            lock_delay_ms: parse(var("BRICKFALL_LOCK_DELAY_MS"))
                .unwrap_or(defaults.game.lock_delay_ms),
            lock_reset_limit: parse(var("BRICKFALL_LOCK_RESETS"))
                .unwrap_or(defaults.game.lock_reset_limit),
            randomizer: var("BRICKFALL_RANDOMIZER")
                .and_then(|s| Randomizer::from_str(&s))
                .unwrap_or(defaults.game.randomizer),
            seed: parse(var("BRICKFALL_SEED")).unwrap_or(defaults.game.seed),
            scoring: var("BRICKFALL_SCORING")
                .and_then(|s| ScoringRule::from_str(&s))
                .unwrap_or(defaults.game.scoring),
        };

        let versus = var("BRICKFALL_VERSUS")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(defaults.versus);

        Self {
            game,
            tick_ms: parse(var("BRICKFALL_TICK_MS")).unwrap_or(defaults.tick_ms),
            max_pending_commands: parse(var("BRICKFALL_MAX_PENDING"))
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_pending_commands),
            versus,
        }
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(RuntimeConfig::from_lookup(|_| None), RuntimeConfig::default());
    }

    #[test]
    fn test_values_are_parsed() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("BRICKFALL_ROWS", "20"),
            ("BRICKFALL_DIFFICULTY", "Hard"),
            ("BRICKFALL_RANDOMIZER", "bag"),
            ("BRICKFALL_SEED", "99"),
            ("BRICKFALL_SCORING", "multiplier"),
            ("BRICKFALL_TICK_MS", "0"),
            ("BRICKFALL_VERSUS", "true"),
        ]));
        assert_eq!(config.game.rows, 20);
        assert_eq!(config.game.cols, 10);
        assert_eq!(config.game.difficulty, Difficulty::Hard);
        assert_eq!(config.game.randomizer, Randomizer::Bag);
        assert_eq!(config.game.seed, 99);
        assert_eq!(config.game.scoring, ScoringRule::MultiplierOnly);
        assert_eq!(config.tick_ms, 0);
        assert!(config.versus);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("BRICKFALL_COLS", "2"),
            ("BRICKFALL_LOCK_DELAY_MS", "soon"),
            ("BRICKFALL_DIFFICULTY", "nightmare"),
            ("BRICKFALL_MAX_PENDING", "0"),
        ]));
        assert_eq!(config.game.cols, 10);
        assert_eq!(config.game.lock_delay_ms, 500);
        assert_eq!(config.game.difficulty, Difficulty::Medium);
        assert_eq!(config.max_pending_commands, 64);
    }
}
