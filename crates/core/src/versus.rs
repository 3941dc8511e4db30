//! Two-board versus mode
//!
//! Two fully independent controllers that share nothing but the config they
//! were built from. Piece actions go to one side; session actions (new game,
//! pause) and time go to both.

use crate::config::GameConfig;
use crate::controller::{GameController, StepOutcome};
use crate::types::GameAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Parse from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "p1" => Some(Side::Left),
            "right" | "p2" => Some(Side::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug)]
pub struct Versus {
    left: GameController,
    right: GameController,
}

impl Versus {
    /// Both sides start from the same config, so they see the same piece sequence.
    pub fn new(config: GameConfig) -> Self {
        Self::from_controllers(GameController::new(config), GameController::new(config))
    }

    pub fn from_controllers(left: GameController, right: GameController) -> Self {
        Self { left, right }
    }

    pub fn side(&self, side: Side) -> &GameController {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut GameController {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Route a piece action to one side. Session actions go to both and the
    /// outcome of `side` is returned.
    pub fn apply(&mut self, side: Side, action: GameAction) -> StepOutcome {
        if action.is_piece_action() {
            return self.side_mut(side).apply(action);
        }
        let (left, right) = self.broadcast(action);
        match side {
            Side::Left => left,
            Side::Right => right,
        }
    }

    /// Apply an action to both sides, left first.
    pub fn broadcast(&mut self, action: GameAction) -> (StepOutcome, StepOutcome) {
        (self.left.apply(action), self.right.apply(action))
    }

    pub fn advance(&mut self, elapsed_ms: u32) -> (StepOutcome, StepOutcome) {
        (self.left.advance(elapsed_ms), self.right.advance(elapsed_ms))
    }

    /// The surviving side once exactly one board has topped out.
    pub fn winner(&self) -> Option<Side> {
        match (self.left.is_game_over(), self.right.is_game_over()) {
            (true, false) => Some(Side::Right),
            (false, true) => Some(Side::Left),
            _ => None,
        }
    }
}
