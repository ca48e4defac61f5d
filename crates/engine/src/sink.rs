//! Score sinks receive the final result of a game

use crate::core::GameSummary;

pub trait ScoreSink {
    /// Called once per finished game
    fn record(&mut self, summary: GameSummary);
}

/// Keeps every summary in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    summaries: Vec<GameSummary>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> &[GameSummary] {
        &self.summaries
    }

    pub fn best(&self) -> Option<GameSummary> {
        self.summaries.iter().copied().max_by_key(|s| s.score)
    }
}

impl ScoreSink for MemorySink {
    fn record(&mut self, summary: GameSummary) {
        self.summaries.push(summary);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn record(&mut self, _summary: GameSummary) {}
}
