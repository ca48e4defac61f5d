//! Frame driver wiring a game to its collaborators
//!
//! Each frame pulls elapsed time from the [`Clock`] and actions from the [`InputSource`], runs
//! one [`step`], and reports the final [`GameSummary`] to the [`ScoreSink`] once the game ends.
//! Time that passes while the game is paused is read from the clock and thrown away. On the
//! frame that pauses, the elapsed time is ticked before the pause takes effect.

use log::info;

use crate::clock::Clock;
use crate::core::{EngineConfig, GameState, GameSummary};
use crate::input::{ActionBatch, InputSource};
use crate::reducer::{reset, step};
use crate::sink::ScoreSink;
use crate::types::{EngineError, GameAction};

pub struct Session<C, I, S> {
    state: GameState,
    clock: C,
    input: I,
    sink: S,
    actions: ActionBatch,
    frames: u64,
    reported: bool,
}

impl<C, I, S> Session<C, I, S>
where
    C: Clock,
    I: InputSource,
    S: ScoreSink,
{
    pub fn new(config: EngineConfig, clock: C, input: I, sink: S) -> Result<Self, EngineError> {
        Ok(Self::from_state(reset(config)?, clock, input, sink))
    }

    pub fn from_state(state: GameState, clock: C, input: I, sink: S) -> Self {
        Self {
            state,
            clock,
            input,
            sink,
            actions: ActionBatch::new(),
            frames: 0,
            reported: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. Returns whether the game is still running.
    pub fn frame(&mut self) -> Result<bool, EngineError> {
        let elapsed = self.clock.elapsed_ms();

        self.actions.clear();
        self.input.poll(&mut self.actions);

        if self.state.is_paused() {
            self.state = step(&self.state, &self.actions, 0)?;
        } else {
            // Time up to a pause press was played unpaused: tick it before pausing.
            let split = self
                .actions
                .iter()
                .position(|&action| action == GameAction::Pause)
                .unwrap_or(self.actions.len());
            let (before, from_pause) = self.actions.split_at(split);
            self.state = step(&self.state, before, elapsed)?;
            if !from_pause.is_empty() {
                self.state = step(&self.state, from_pause, 0)?;
            }
        }
        self.frames += 1;

        if self.state.is_game_over() && !self.reported {
            let summary = self.state.summary();
            info!(
                "session finished after {} frames: score {}",
                self.frames, summary.score
            );
            self.sink.record(summary);
            self.reported = true;
        }

        Ok(!self.state.is_game_over())
    }

    /// Run up to `max_frames` frames, stopping early at game over
    pub fn run(&mut self, max_frames: u64) -> Result<GameSummary, EngineError> {
        for _ in 0..max_frames {
            if !self.frame()? {
                break;
            }
        }
        Ok(self.state.summary())
    }

    /// New game on an empty board, continuing the randomizer sequence
    pub fn restart(&mut self) {
        self.state.restart();
        self.reported = false;
    }

    pub fn into_parts(self) -> (GameState, C, I, S) {
        (self.state, self.clock, self.input, self.sink)
    }
}
