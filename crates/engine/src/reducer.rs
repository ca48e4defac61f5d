//! Pure state transitions
//!
//! Every function validates its input first, works on a copy and returns either the fully
//! updated state or an error. The input state is never touched. An action that does not apply
//! yields the state unchanged (apart from a rejected rotation forgetting the last rotation).

use log::warn;

use crate::core::{EngineConfig, GameState};
use crate::types::{EngineError, GameAction};

fn checked(state: &GameState) -> Result<GameState, EngineError> {
    if let Err(err) = state.validate() {
        warn!("rejected state: {err}");
        return Err(err);
    }
    Ok(state.clone())
}

/// Fresh game with a fresh randomizer seeded from `config`
pub fn reset(config: EngineConfig) -> Result<GameState, EngineError> {
    GameState::with_config(config)
}

pub fn apply_action(state: &GameState, action: GameAction) -> Result<GameState, EngineError> {
    let mut next = checked(state)?;
    next.try_apply_action(action)?;
    Ok(next)
}

/// Advance gravity and lock delay
pub fn tick(state: &GameState, delta_ms: u32) -> Result<GameState, EngineError> {
    let mut next = checked(state)?;
    next.try_tick(delta_ms)?;
    Ok(next)
}

/// One frame: every action in order, then a single tick
pub fn step(
    state: &GameState,
    actions: &[GameAction],
    delta_ms: u32,
) -> Result<GameState, EngineError> {
    let mut next = checked(state)?;
    for &action in actions {
        next.try_apply_action(action)?;
    }
    next.try_tick(delta_ms)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, Piece};
    use crate::types::{PieceKind, Rotation};

    #[test]
    fn test_apply_action_leaves_input_untouched() {
        let state = reset(EngineConfig::with_seed(7)).unwrap();
        let before = state.clone();
        let next = apply_action(&state, GameAction::HardDrop).unwrap();
        assert_eq!(state, before);
        assert_eq!(next.pieces_locked(), 1);
    }

    #[test]
    fn test_inapplicable_action_returns_same_state() {
        let state = reset(EngineConfig::with_seed(7)).unwrap();
        let paused = apply_action(&state, GameAction::Pause).unwrap();
        let next = apply_action(&paused, GameAction::MoveLeft).unwrap();
        assert_eq!(next, paused);
    }

    #[test]
    fn test_reset_is_reproducible() {
        let config = EngineConfig::with_seed(99);
        let a = step(&reset(config).unwrap(), &[GameAction::HardDrop], 16).unwrap();
        let b = step(&reset(config).unwrap(), &[GameAction::HardDrop], 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_step_applies_actions_before_tick() {
        let state = reset(EngineConfig::with_seed(3)).unwrap();
        let y = state.current().unwrap().y;
        // One row from the soft drop, one from gravity
        let next = step(&state, &[GameAction::SoftDrop], 1000).unwrap();
        assert_eq!(next.current().unwrap().y, y + 2);
        assert_eq!(next.score(), 1);
    }

    #[test]
    fn test_reset_rejects_bad_config() {
        let config = EngineConfig {
            preview_count: 9,
            ..EngineConfig::default()
        };
        assert!(matches!(reset(config), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_state_is_reported() {
        let mut rows = vec![".........."; 20];
        rows[19] = "IIIIIIIII.";
        let board = Board::from_rows(&rows).unwrap();
        let piece = Piece::new(PieceKind::O, Rotation::North, 4, 18);
        let err = crate::core::GameState::from_position(EngineConfig::default(), board, piece)
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, EngineError::InvalidState(_)));
    }
}
