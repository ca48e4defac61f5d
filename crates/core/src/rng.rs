//! RNG module - 7-bag random piece generation
//!
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled with Fisher-Yates.
//! The bag is drained in order, then a fresh bag is shuffled. Any 7 consecutive draws
//! starting on a bag boundary therefore contain every kind exactly once.
//!
//! [`PieceQueue`] keeps the upcoming pieces materialized so the preview is a plain read.

use arrayvec::ArrayVec;

use crate::types::{EngineError, PieceKind, MAX_PREVIEW_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state is a fixed point for some LCG variants; keep it out.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Shuffled-bag piece generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagRandomizer {
    bag: [PieceKind; 7],
    /// Index of the next piece in `bag`; 7 means the bag is spent
    bag_index: usize,
    rng: SimpleRng,
}

impl BagRandomizer {
    pub fn new(seed: u32) -> Self {
        let mut randomizer = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        randomizer.refill_bag();
        randomizer
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece, shuffling a new bag when the current one is spent
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Pieces still waiting in the current bag
    pub fn remaining_in_bag(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }

    /// Current RNG state (for restarting with a fresh but reproducible sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

/// Upcoming pieces, kept topped up to the preview length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceQueue {
    pending: ArrayVec<PieceKind, MAX_PREVIEW_COUNT>,
    preview_count: usize,
    randomizer: BagRandomizer,
}

impl PieceQueue {
    /// Create a queue with the given seed and preview length (clamped to 1..=7)
    pub fn new(seed: u32, preview_count: usize) -> Self {
        let mut queue = Self {
            pending: ArrayVec::new(),
            preview_count: preview_count.clamp(1, MAX_PREVIEW_COUNT),
            randomizer: BagRandomizer::new(seed),
        };
        queue.refill();
        queue
    }

    fn refill(&mut self) {
        while self.pending.len() < self.preview_count {
            self.pending.push(self.randomizer.draw());
        }
    }

    /// Take the next piece and top the queue back up
    pub fn pop(&mut self) -> Result<PieceKind, EngineError> {
        if self.pending.is_empty() {
            return Err(EngineError::QueueUnderflow);
        }
        let next = self.pending.remove(0);
        self.refill();
        Ok(next)
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> Option<PieceKind> {
        self.pending.first().copied()
    }

    /// The next `preview_count` pieces, in draw order
    pub fn preview(&self) -> &[PieceKind] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn preview_count(&self) -> usize {
        self.preview_count
    }

    pub fn randomizer(&self) -> &BagRandomizer {
        &self.randomizer
    }

    /// Get the current RNG state (for restarting game with a new sequence)
    pub fn seed(&self) -> u32 {
        self.randomizer.seed()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1, crate::types::DEFAULT_PREVIEW_COUNT as usize)
    }
}
