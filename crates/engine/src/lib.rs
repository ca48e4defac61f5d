//! Engine boundary - pure reducers plus the collaborators a frontend plugs in
//!
//! - [`reducer`]: `(state, action_or_delta) -> state` functions that never mutate their input
//! - [`clock`], [`input`], [`sink`]: traits for time, actions and final scores
//! - [`session`]: a frame driver wiring a game to those collaborators
//!
//! ```
//! use blockfall_engine::{reducer, GameAction};
//! use blockfall_engine::core::EngineConfig;
//!
//! let state = reducer::reset(EngineConfig::with_seed(9)).unwrap();
//! let next = reducer::step(&state, &[GameAction::HardDrop], 16).unwrap();
//! assert_eq!(next.pieces_locked(), 1);
//! assert_eq!(state.pieces_locked(), 0);
//! ```

pub mod clock;
pub mod input;
pub mod reducer;
pub mod session;
pub mod sink;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use input::{ActionBatch, InputSource, ScriptedInput, MAX_ACTIONS_PER_FRAME};
pub use reducer::{apply_action, reset, step, tick};
pub use session::Session;
pub use sink::{MemorySink, NullSink, ScoreSink};
pub use types::GameAction;
