//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental vocabulary used throughout the engine.
//! All types are pure data with no external dependencies, so they can be used
//! by the rules engine, the command runtime and any external renderer alike.
//!
//! # Board Dimensions
//!
//! The reference playfield is 25 rows by 10 columns. Row 0 is the top (spawn
//! area) and row 24 is the floor. Cells hold `0` for empty or the color tag
//! (1..=7) of the piece kind that was locked there.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LOCK_DELAY_MS` | 500 | Grace period before a grounded piece locks |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock timer restarts per piece |
//! | `TICK_MS` | 16 | Default interval of the runtime clock |
//!
//! # Difficulty Tiers
//!
//! | Difficulty | Gravity |
//! |------------|---------|
//! | Easy | 800ms |
//! | Medium | 400ms |
//! | Hard | 200ms |
//!
//! # Examples
//!
//! ```
//! use brickfall_types::{Difficulty, GameAction, PieceKind, BOARD_COLS, BOARD_ROWS};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.color(), 6);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(Difficulty::Medium.drop_interval_ms(), 400);
//! assert_eq!((BOARD_ROWS, BOARD_COLS), (25, 10));
//! ```

/// Board height in rows (25)
pub const BOARD_ROWS: usize = 25;

/// Board width in columns (10)
pub const BOARD_COLS: usize = 10;

/// Lock delay when piece is grounded (500ms)
pub const LOCK_DELAY_MS: u32 = 500;

/// Maximum number of lock timer restarts per piece (15)
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Default interval of the runtime clock in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Number of distinct piece kinds; also the largest valid cell value.
pub const PIECE_KIND_COUNT: u8 = 7;

/// Line clear base points, indexed by number of lines removed.
///
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// A cell on the game board
///
/// - `0`: Empty cell
/// - `1..=7`: Cell filled by the piece kind with that color tag
pub type Cell = u8;

/// The empty cell value.
pub const EMPTY: Cell = 0;

/// The seven tetromino piece kinds
///
/// The color tag of each kind doubles as the value its cells take in the grid:
/// - **I** (1): long bar
/// - **J** (2)
/// - **L** (3)
/// - **O** (4): 2x2 square
/// - **S** (5)
/// - **T** (6)
/// - **Z** (7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in color-tag order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Numeric color tag written into the grid when this kind locks.
    pub fn color(&self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::color`].
    ///
    /// ```
    /// use brickfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_color(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_color(0), None);
    /// assert_eq!(PieceKind::from_color(8), None);
    /// ```
    pub fn from_color(color: Cell) -> Option<Self> {
        match color {
            1..=7 => Some(Self::ALL[(color - 1) as usize]),
            _ => None,
        }
    }

    /// Which wall-kick offset family this kind uses.
    pub fn kick_class(&self) -> KickClass {
        match self {
            PieceKind::O => KickClass::Square,
            PieceKind::I => KickClass::Long,
            _ => KickClass::Standard,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Wall-kick table selector, carried by each piece kind as data.
///
/// - **Square**: O piece, only the no-op offset
/// - **Long**: I piece, wider kicks
/// - **Standard**: J, L, S, T and Z share one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KickClass {
    Square,
    Long,
    Standard,
}

/// Gravity tiers (milliseconds per automatic downward step)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Interval between automatic downward steps.
    pub fn drop_interval_ms(&self) -> u32 {
        match self {
            Difficulty::Easy => 800,
            Difficulty::Medium => 400,
            Difficulty::Hard => 200,
        }
    }

    /// Parse difficulty from string (case-insensitive)
    ///
    /// ```
    /// use brickfall_types::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
    /// assert_eq!(Difficulty::from_str("impossible"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Input commands accepted by the game controller
///
/// Each action maps 1:1 to a board or controller operation. Time passing is
/// not an action; it is pumped separately as elapsed milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece to its next orientation, with wall kicks
    RotateCw,
    /// Step piece one cell down, same rules as a gravity step
    SoftDrop,
    /// Drop piece as far as it goes and lock it immediately
    HardDrop,
    /// Swap the current piece with the held one (once per piece)
    Hold,
    /// Start a fresh game
    NewGame,
    /// Suspend ticks and moves
    Pause,
    /// Resume after a pause
    Resume,
    /// Pause if running, resume if paused
    TogglePause,
}

impl GameAction {
    /// Parse action from string (case-insensitive camelCase names)
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotatecw" | "rotate" => Some(GameAction::RotateCw),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "hold" => Some(GameAction::Hold),
            "newgame" => Some(GameAction::NewGame),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            "togglepause" => Some(GameAction::TogglePause),
            _ => None,
        }
    }

    /// Convert to camelCase string for the line protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::RotateCw => "rotateCw",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Hold => "hold",
            GameAction::NewGame => "newGame",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
            GameAction::TogglePause => "togglePause",
        }
    }

    /// Whether the action moves or replaces the falling piece.
    pub fn is_piece_action(&self) -> bool {
        matches!(
            self,
            GameAction::MoveLeft
                | GameAction::MoveRight
                | GameAction::RotateCw
                | GameAction::SoftDrop
                | GameAction::HardDrop
                | GameAction::Hold
        )
    }
}
