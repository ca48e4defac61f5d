//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the engine.
//! All types are plain data with no runtime dependencies, making them usable
//! from the rules engine, the reducer boundary, and any external renderer.
//! With the `serde` feature enabled every public type is serializable.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn column**: `(BOARD_WIDTH - piece width) / 2`, row 0
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Nominal frame interval (~60 FPS) |
//! | `LOCK_DELAY_MS` | 500 | Grace period for a grounded piece |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock timer resets per piece |
//!
//! # Drop Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 800ms |
//! | 3 | 650ms |
//! | 4 | 500ms |
//! | 5 | 400ms |
//! | 6 | 320ms |
//! | 7 | 250ms |
//! | 8 | 200ms |
//! | 9 | 160ms |
//! | 10+ | 120ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::West.index(), 3);
//!
//! let action = GameAction::from_str("rotate180").unwrap();
//! assert_eq!(action, GameAction::Rotate180);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Nominal frame interval in milliseconds
pub const TICK_MS: u32 = 16;

/// Default lock delay for a grounded piece
pub const LOCK_DELAY_MS: u32 = 500;

/// Default maximum number of lock timer resets per piece
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Default number of queued pieces exposed as preview
pub const DEFAULT_PREVIEW_COUNT: u8 = 5;

/// Upper bound for the preview window (fixed queue capacity)
pub const MAX_PREVIEW_COUNT: usize = 7;

/// Drop intervals by level, starting at level 1 (milliseconds per row)
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Drop interval used for every level past the table ("kill screen")
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table, indexed by lines cleared. Multiplied by level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Full T-spin scoring table, indexed by lines cleared. Multiplied by level.
pub const TSPIN_FULL_SCORES: [u32; 4] = [400, 800, 1200, 1600];

/// Mini T-spin scoring table, indexed by lines cleared. Multiplied by level.
pub const TSPIN_MINI_SCORES: [u32; 3] = [100, 200, 400];

/// Combo scoring base value (per combo step, multiplied by level)
pub const COMBO_BASE: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// Points per row of a manual soft drop step
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row of hard drop distance
pub const HARD_DROP_POINTS: u32 = 2;


/// The seven tetromino piece kinds
///
/// - **I**: horizontal bar
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Grid code used in snapshots (1..=7, 0 is reserved for empty)
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Rotation states (North = spawn orientation, index 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    pub fn rotate_180(&self) -> Self {
        self.rotate_cw().rotate_cw()
    }

    /// Rotation state index in `0..=3`
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build from an index; wraps modulo 4
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" | "0" => Some(Rotation::North),
            "east" | "e" | "1" => Some(Rotation::East),
            "south" | "s" | "2" => Some(Rotation::South),
            "west" | "w" | "3" => Some(Rotation::West),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Requested direction of a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
    Half,
}

impl RotationDirection {
    pub fn apply(&self, rotation: Rotation) -> Rotation {
        match self {
            RotationDirection::Clockwise => rotation.rotate_cw(),
            RotationDirection::CounterClockwise => rotation.rotate_ccw(),
            RotationDirection::Half => rotation.rotate_180(),
        }
    }
}

/// Discrete, already-debounced input pulses accepted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    #[cfg_attr(feature = "serde", serde(alias = "rotateCW"))]
    RotateCw,
    #[cfg_attr(feature = "serde", serde(alias = "rotateCCW"))]
    RotateCcw,
    Rotate180,
    Hold,
    Pause,
}

impl GameAction {
    pub const ALL: [GameAction; 9] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::Rotate180,
        GameAction::Hold,
        GameAction::Pause,
    ];

    /// Parse action from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "rotate180" => Some(GameAction::Rotate180),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Rotate180 => "rotate180",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
        }
    }

    /// Rotation direction for rotate actions
    pub fn rotation_direction(&self) -> Option<RotationDirection> {
        match self {
            GameAction::RotateCw => Some(RotationDirection::Clockwise),
            GameAction::RotateCcw => Some(RotationDirection::CounterClockwise),
            GameAction::Rotate180 => Some(RotationDirection::Half),
            _ => None,
        }
    }
}

/// T-Spin detection result
///
/// T-Spins are detected from the four corners of the T piece's 3x3 box.
/// - **None**: Not a T-spin
/// - **Mini**: exactly two corners blocked, one of them on the pointing side
/// - **Full**: three or more corners blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Convert to optional string representation
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::Mini => Some("mini"),
            TSpinKind::Full => Some("full"),
        }
    }
}

/// Lock delay state of the current piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LockState {
    #[default]
    Airborne,
    Grounded,
    Locked,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;

/// Errors crossing the engine boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A malformed board, piece or state was handed to the engine. Caller bug.
    InvalidState(&'static str),
    /// The requested action cannot be applied; callers treat this as a no-op.
    InvalidTransition(&'static str),
    /// The piece queue had nothing to hand out. Randomizer bug.
    QueueUnderflow,
    /// A configuration value is out of range.
    InvalidConfig(&'static str),
}

impl EngineError {
    /// Whether the error must abort the game rather than be ignored
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::InvalidTransition(_))
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            EngineError::InvalidTransition(msg) => write!(f, "invalid transition: {msg}"),
            EngineError::QueueUnderflow => write!(f, "piece queue underflow"),
            EngineError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
