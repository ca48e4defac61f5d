//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules and state management. It has no dependencies on
//! rendering, input devices, storage or networking:
//!
//! - **Deterministic**: the same seed and the same inputs produce the same game
//! - **Testable**: every rule is reachable through plain function calls
//! - **Fast**: ticks and actions run on fixed-size, stack-allocated data
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision detection, merge and line sweeps
//! - [`pieces`]: shape matrices, rotation math and SRS wall kicks
//! - [`rng`]: seeded 7-bag randomizer and the preview queue
//! - [`lock_delay`]: grounded/airborne/locked timer with a reset budget
//! - [`tspin`]: three-corner T-spin classification
//! - [`scoring`]: line values, T-spins, combos, back-to-back and the level curve
//! - [`config`]: per-game tuning
//! - [`game_state`]: the state machine tying everything together
//! - [`snapshot`]: fixed-size read-only views for renderers
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Hard drop awards two points per row
//! assert!(game.score() > 0);
//! assert_eq!(game.pieces_locked(), 1);
//! ```
//!
//! # Timing
//!
//! Nothing runs on its own. Call [`GameState::tick`] with the elapsed milliseconds:
//! gravity moves the piece one row per level interval (1000ms at level 1, down to 120ms) and a
//! grounded piece locks once its lock delay (500ms by default) runs out.

pub mod board;
pub mod config;
pub mod game_state;
pub mod lock_delay;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod tspin;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::EngineConfig;
pub use game_state::{GameState, LockEvent};
pub use lock_delay::LockDelay;
pub use pieces::{get_shape, try_rotate, Piece, RotationMeta, ShapeMatrix};
pub use rng::{BagRandomizer, PieceQueue, SimpleRng};
pub use scoring::{calculate_drop_score, calculate_score, ScoreResult};
pub use snapshot::{ActiveSnapshot, GameSnapshot, GameSummary};
pub use tspin::detect_t_spin;
