//! Action sources for the session driver
//!
//! Sources deliver discrete, already-debounced action pulses. Key repeat and device mapping
//! belong to whoever implements [`InputSource`].

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use log::warn;

use crate::types::GameAction;

/// Most actions a single frame can carry
pub const MAX_ACTIONS_PER_FRAME: usize = 16;

/// Actions collected for one frame
pub type ActionBatch = ArrayVec<GameAction, MAX_ACTIONS_PER_FRAME>;

pub trait InputSource {
    /// Append this frame's actions to `out`, in the order they happened
    fn poll(&mut self, out: &mut ActionBatch);
}

/// Pre-recorded per-frame batches
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<ActionBatch>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the actions of the next frame; extra actions beyond the batch size are dropped
    pub fn push_frame(&mut self, actions: &[GameAction]) {
        let mut batch = ActionBatch::new();
        for &action in actions {
            if batch.try_push(action).is_err() {
                warn!(
                    "frame has {} actions, keeping the first {MAX_ACTIONS_PER_FRAME}",
                    actions.len()
                );
                break;
            }
        }
        self.frames.push_back(batch);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, out: &mut ActionBatch) {
        if let Some(batch) = self.frames.pop_front() {
            for action in batch {
                if out.try_push(action).is_err() {
                    break;
                }
            }
        }
    }
}
