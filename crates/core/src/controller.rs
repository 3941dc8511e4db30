//! Game controller - per-input and per-tick orchestration
//!
//! The controller drives one [`Board`] through the move / lock / clear /
//! spawn cycle:
//!
//! - Gravity: pumped time accumulates and every `drop_interval_ms` of it
//!   performs one downward step, exactly like a soft drop.
//! - Lock delay: a failed downward step starts a logical timer; once it
//!   reaches `lock_delay_ms` the piece locks. Successful moves and rotations
//!   while grounded restart it (up to `lock_reset_limit` times per piece) and
//!   clear it when the piece is airborne again.
//! - Hold: once per spawned piece; re-armed only by the lock-spawn.
//! - Pause: while paused, only session actions are honored.
//! - Game over: a spawn that collides is terminal until `NewGame`.
//!
//! The controller holds no clock of its own. Callers pump elapsed time
//! through [`GameController::advance`] and feed input through
//! [`GameController::apply`]; both return a [`StepOutcome`].

use tracing::{debug, info, instrument};

use crate::board::Board;
use crate::config::GameConfig;
use crate::matrix::ClearRow;
use crate::rng::PieceGenerator;
use crate::snapshot::{GameSnapshot, ViewData};
use crate::types::{GameAction, PieceKind};

/// Lifecycle of the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Falling,
    GameOver,
}

/// Something a renderer or audio layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    PieceSpawned { kind: PieceKind },
    PieceLocked { kind: PieceKind, x: i32, y: i32 },
    LinesCleared {
        rows: Vec<usize>,
        points: u32,
        combo: u32,
    },
    Held { held: PieceKind, current: PieceKind },
    Paused,
    Resumed,
    GameOver { score: u32 },
}

/// Result of one controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether any observable state changed.
    pub changed: bool,
    /// Set when a lock removed at least one row.
    pub cleared: Option<ClearRow>,
    pub events: Vec<GameEvent>,
    pub view: ViewData,
}

impl StepOutcome {
    pub fn game_over(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, GameEvent::GameOver { .. }))
    }
}

/// What one downward step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DownStep {
    Moved,
    Grounded,
    Locked,
}

#[derive(Debug, Default)]
struct Pending {
    changed: bool,
    cleared: Option<ClearRow>,
    events: Vec<GameEvent>,
}

#[derive(Debug)]
pub struct GameController {
    config: GameConfig,
    board: Board,
    phase: Phase,
    paused: bool,
    /// Milliseconds spent grounded, `None` while airborne.
    lock_timer: Option<u32>,
    lock_resets: u8,
    gravity_ms: u32,
    held: Option<PieceKind>,
    can_hold: bool,
}

impl GameController {
    /// Start a game using the generator described by `config`.
    pub fn new(config: GameConfig) -> Self {
        let generator = config.generator();
        Self::with_generator(config, generator)
    }

    pub fn with_generator(config: GameConfig, generator: Box<dyn PieceGenerator>) -> Self {
        let board = Board::new(config.rows, config.cols, generator);
        Self::with_board(config, board)
    }

    /// Take over a prepared board; grid size comes from the board.
    pub fn with_board(config: GameConfig, board: Board) -> Self {
        let phase = if board.collides() {
            Phase::GameOver
        } else {
            Phase::Falling
        };
        Self {
            config,
            board,
            phase,
            paused: false,
            lock_timer: None,
            lock_resets: 0,
            gravity_ms: 0,
            held: None,
            can_hold: true,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Falling && !self.paused
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Elapsed grounded time, `None` when no lock is pending.
    pub fn lock_timer_ms(&self) -> Option<u32> {
        self.lock_timer
    }

    pub fn view(&self) -> ViewData {
        self.board.current_snapshot()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let score = self.board.score();
        GameSnapshot {
            grid: self.board.grid().to_rows(),
            view: self.board.current_snapshot(),
            held: self.held,
            can_hold: self.can_hold,
            score: score.total(),
            combo: score.combo(),
            lines: score.lines_cleared(),
            high_score: score.high_score(),
            paused: self.paused,
            game_over: self.is_game_over(),
            difficulty: self.config.difficulty,
        }
    }

    /// Apply one input command.
    #[instrument(level = "trace", skip(self), fields(phase = ?self.phase, paused = self.paused))]
    pub fn apply(&mut self, action: GameAction) -> StepOutcome {
        let mut pending = Pending::default();
        match action {
            GameAction::NewGame => self.new_game(&mut pending),
            GameAction::Pause => self.set_paused(true, &mut pending),
            GameAction::Resume => self.set_paused(false, &mut pending),
            GameAction::TogglePause => self.set_paused(!self.paused, &mut pending),
            _ if !self.playable() => {}
            GameAction::MoveLeft => {
                pending.changed = self.board.move_left();
                self.after_shift(pending.changed);
            }
            GameAction::MoveRight => {
                pending.changed = self.board.move_right();
                self.after_shift(pending.changed);
            }
            GameAction::RotateCw => {
                pending.changed = self.board.rotate();
                self.after_shift(pending.changed);
            }
            GameAction::SoftDrop => {
                pending.changed = self.step_down(&mut pending) != DownStep::Grounded;
            }
            GameAction::HardDrop => self.hard_drop(&mut pending),
            GameAction::Hold => self.hold(&mut pending),
        }
        self.finish(pending)
    }

    /// Pump `elapsed_ms` of game time: gravity steps and lock-delay expiry.
    pub fn advance(&mut self, elapsed_ms: u32) -> StepOutcome {
        let mut pending = Pending::default();
        if !self.playable() {
            return self.finish(pending);
        }

        if let Some(timer) = self.lock_timer {
            self.lock_timer = Some(timer.saturating_add(elapsed_ms));
        }

        let interval = self.config.difficulty.drop_interval_ms().max(1);
        self.gravity_ms = self.gravity_ms.saturating_add(elapsed_ms);
        while self.gravity_ms >= interval {
            self.gravity_ms -= interval;
            match self.step_down(&mut pending) {
                DownStep::Moved => pending.changed = true,
                DownStep::Locked => {
                    pending.changed = true;
                    self.gravity_ms = 0;
                    break;
                }
                // Further steps cannot move a grounded piece
                DownStep::Grounded => {
                    self.gravity_ms %= interval;
                    break;
                }
            }
        }

        if self.phase == Phase::Falling && self.lock_timer.is_some() {
            if !self.board.is_grounded() {
                self.lock_timer = None;
            } else if self.lock_due() {
                self.lock_sequence(&mut pending);
                pending.changed = true;
            }
        }

        self.finish(pending)
    }

    fn lock_due(&self) -> bool {
        self.lock_timer
            .is_some_and(|elapsed| elapsed >= self.config.lock_delay_ms)
    }

    /// One downward step shared by gravity and soft drop.
    fn step_down(&mut self, pending: &mut Pending) -> DownStep {
        if self.board.move_down() {
            self.lock_timer = None;
            return DownStep::Moved;
        }
        if self.lock_timer.is_none() {
            self.lock_timer = Some(0);
        }
        if self.lock_due() {
            self.lock_sequence(pending);
            DownStep::Locked
        } else {
            DownStep::Grounded
        }
    }

    /// Lock timer bookkeeping after a lateral move or rotation attempt.
    fn after_shift(&mut self, moved: bool) {
        if !moved {
            return;
        }
        if !self.board.is_grounded() {
            self.lock_timer = None;
            return;
        }
        match self.lock_timer {
            None => self.lock_timer = Some(0),
            Some(_) if self.lock_resets < self.config.lock_reset_limit => {
                self.lock_resets += 1;
                self.lock_timer = Some(0);
            }
            Some(_) => {}
        }
    }

    fn hard_drop(&mut self, pending: &mut Pending) {
        let mut rows = 0;
        while self.board.move_down() {
            rows += 1;
        }
        debug!(rows, "hard drop");
        self.lock_sequence(pending);
        pending.changed = true;
    }

    fn hold(&mut self, pending: &mut Pending) {
        if !self.can_hold {
            return;
        }
        let current = self.board.current_kind();
        let collided = match self.held.replace(current) {
            None => {
                let collided = self.board.spawn_next();
                pending.events.push(GameEvent::PieceSpawned {
                    kind: self.board.current_kind(),
                });
                collided
            }
            Some(previous) => self.board.set_held_piece(previous),
        };
        self.can_hold = false;
        self.reset_piece_timers();
        pending.changed = true;
        pending.events.push(GameEvent::Held {
            held: current,
            current: self.board.current_kind(),
        });
        debug!(held = ?current, current = ?self.board.current_kind(), "piece held");

        if collided {
            self.enter_game_over(pending);
        }
    }

    /// merge -> clear -> score -> spawn -> re-arm hold -> reset timers
    fn lock_sequence(&mut self, pending: &mut Pending) {
        let kind = self.board.current_kind();
        let (x, y) = self.board.position();
        self.board.lock_current();
        pending.events.push(GameEvent::PieceLocked { kind, x, y });

        let clear = self.board.clear_lines();
        let points = self
            .board
            .score_mut()
            .record_lock(clear.lines_removed, self.config.scoring);
        if clear.lines_removed > 0 {
            let combo = self.board.score().combo();
            debug!(lines = clear.lines_removed, points, combo, "lock cleared lines");
            pending.events.push(GameEvent::LinesCleared {
                rows: clear.cleared_rows.clone(),
                points,
                combo,
            });
            pending.cleared = Some(clear);
        }

        let collided = self.board.spawn_next();
        self.can_hold = true;
        self.reset_piece_timers();
        self.gravity_ms = 0;

        if collided {
            self.enter_game_over(pending);
        } else {
            pending.events.push(GameEvent::PieceSpawned {
                kind: self.board.current_kind(),
            });
        }
    }

    fn reset_piece_timers(&mut self) {
        self.lock_timer = None;
        self.lock_resets = 0;
    }

    fn enter_game_over(&mut self, pending: &mut Pending) {
        self.phase = Phase::GameOver;
        self.reset_piece_timers();
        let score = self.board.score().total();
        info!(score, lines = self.board.score().lines_cleared(), "game over");
        pending.events.push(GameEvent::GameOver { score });
    }

    fn set_paused(&mut self, paused: bool, pending: &mut Pending) {
        if self.phase == Phase::GameOver || self.paused == paused {
            return;
        }
        self.paused = paused;
        pending.changed = true;
        pending.events.push(if paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
        debug!(paused, "pause state changed");
    }

    fn new_game(&mut self, pending: &mut Pending) {
        let collided = self.board.reset_for_new_game();
        self.phase = Phase::Falling;
        self.paused = false;
        self.held = None;
        self.can_hold = true;
        self.gravity_ms = 0;
        self.reset_piece_timers();
        pending.changed = true;
        pending.events.push(GameEvent::GameStarted);
        info!(high_score = self.board.score().high_score(), "new game");

        if collided {
            self.enter_game_over(pending);
        } else {
            pending.events.push(GameEvent::PieceSpawned {
                kind: self.board.current_kind(),
            });
        }
    }

    fn finish(&self, pending: Pending) -> StepOutcome {
        StepOutcome {
            changed: pending.changed,
            cleared: pending.cleared,
            events: pending.events,
            view: self.board.current_snapshot(),
        }
    }
}
