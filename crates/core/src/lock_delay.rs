//! Lock delay tracking for the active piece
//!
//! A grounded piece does not lock immediately. It gets `delay_ms` of grace; every successful
//! move or rotation performed while grounded restarts the timer, up to `max_resets` times per
//! piece. Once the budget is spent the timer keeps running and the piece locks when it expires.

use crate::types::{LockState, LOCK_DELAY_MS, LOCK_RESET_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockDelay {
    state: LockState,
    /// Remaining grace time while grounded
    timer_ms: u32,
    resets: u8,
    delay_ms: u32,
    max_resets: u8,
}

impl LockDelay {
    pub fn new(delay_ms: u32, max_resets: u8) -> Self {
        Self {
            state: LockState::Airborne,
            timer_ms: delay_ms,
            resets: 0,
            delay_ms,
            max_resets,
        }
    }

    /// Fresh tracking for a newly spawned piece
    pub fn on_spawn(&mut self, grounded: bool) {
        self.resets = 0;
        self.timer_ms = self.delay_ms;
        self.state = if grounded {
            LockState::Grounded
        } else {
            LockState::Airborne
        };
    }

    /// A move or rotation succeeded
    ///
    /// Returns true when the move consumed a reset.
    pub fn on_move(&mut self, was_grounded: bool, grounded_now: bool) -> bool {
        let mut reset = false;
        if was_grounded && self.resets < self.max_resets {
            self.timer_ms = self.delay_ms;
            self.resets += 1;
            reset = true;
        }
        self.set_grounded(grounded_now);
        reset
    }

    /// The piece moved down a row (gravity or soft drop)
    pub fn on_fall(&mut self, grounded_now: bool) {
        self.set_grounded(grounded_now);
    }

    fn set_grounded(&mut self, grounded: bool) {
        if self.state == LockState::Locked {
            return;
        }
        self.state = if grounded {
            LockState::Grounded
        } else {
            LockState::Airborne
        };
    }

    /// Run the timer while grounded. Returns true when the piece must lock now.
    pub fn advance(&mut self, delta_ms: u32) -> bool {
        if self.state != LockState::Grounded {
            return false;
        }
        self.timer_ms = self.timer_ms.saturating_sub(delta_ms);
        if self.timer_ms == 0 {
            self.state = LockState::Locked;
            return true;
        }
        false
    }

    /// Lock immediately (hard drop)
    pub fn force_lock(&mut self) {
        self.timer_ms = 0;
        self.state = LockState::Locked;
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn timer_ms(&self) -> u32 {
        self.timer_ms
    }

    pub fn resets(&self) -> u8 {
        self.resets
    }

    pub fn max_resets(&self) -> u8 {
        self.max_resets
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn resets_exhausted(&self) -> bool {
        self.resets >= self.max_resets
    }
}

impl Default for LockDelay {
    fn default() -> Self {
        Self::new(LOCK_DELAY_MS, LOCK_RESET_LIMIT)
    }
}
