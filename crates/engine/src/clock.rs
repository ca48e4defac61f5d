//! Time sources for the session driver

use std::collections::VecDeque;
use std::time::Instant;

/// Monotonic elapsed time, measured between consecutive calls
pub trait Clock {
    /// Milliseconds since the previous call (or since creation for the first call)
    fn elapsed_ms(&mut self) -> u32;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_ms(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_millis();
        self.last = now;
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }
}

/// Scripted deltas for replays and tests; reports 0 once the script runs out
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    deltas: VecDeque<u32>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_deltas(deltas: impl IntoIterator<Item = u32>) -> Self {
        Self {
            deltas: deltas.into_iter().collect(),
        }
    }

    pub fn push(&mut self, delta_ms: u32) {
        self.deltas.push_back(delta_ms);
    }

    pub fn remaining(&self) -> usize {
        self.deltas.len()
    }
}

impl Clock for ManualClock {
    fn elapsed_ms(&mut self) -> u32 {
        self.deltas.pop_front().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_replays_deltas() {
        let mut clock = ManualClock::from_deltas([16, 17]);
        clock.push(5);
        assert_eq!(clock.elapsed_ms(), 16);
        assert_eq!(clock.elapsed_ms(), 17);
        assert_eq!(clock.elapsed_ms(), 5);
        assert_eq!(clock.elapsed_ms(), 0);
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let first = clock.elapsed_ms();
        let second = clock.elapsed_ms();
        assert!(first < 1_000);
        assert!(second < 1_000);
    }
}
