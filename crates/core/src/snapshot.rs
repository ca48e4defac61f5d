//! Read-only views of a game for renderers and score sinks
//!
//! `GameSnapshot` is fixed-size; refilling one with `GameState::snapshot_into` does not allocate.

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::types::{
    LockState, PieceKind, Rotation, TSpinKind, BOARD_HEIGHT, BOARD_WIDTH, MAX_PREVIEW_COUNT,
};

pub type GridSnapshot = [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Absolute board cells of the four minos
    pub cells: [(i8, i8); 4],
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockSnapshot {
    pub state: LockState,
    pub timer_ms: u32,
    pub resets: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    /// Piece codes per cell, 0 = empty
    pub board: GridSnapshot,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next_queue: ArrayVec<PieceKind, MAX_PREVIEW_COUNT>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub back_to_back: bool,
    pub last_tspin: TSpinKind,
    pub lock: LockSnapshot,
    pub paused: bool,
    pub game_over: bool,
    pub piece_id: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.ghost_y = None;
        self.hold = None;
        self.can_hold = true;
        self.next_queue.clear();
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.combo = 0;
        self.back_to_back = false;
        self.last_tspin = TSpinKind::None;
        self.lock = LockSnapshot::default();
        self.paused = false;
        self.game_over = false;
        self.piece_id = 0;
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Number of filled board cells
    pub fn filled_cells(&self) -> usize {
        self.board.iter().flatten().filter(|&&code| code != 0).count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            hold: None,
            can_hold: true,
            next_queue: ArrayVec::new(),
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            back_to_back: false,
            last_tspin: TSpinKind::None,
            lock: LockSnapshot::default(),
            paused: false,
            game_over: false,
            piece_id: 0,
        }
    }
}

/// Final result handed to a score sink at game over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSummary {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    /// Pieces locked during the game
    pub pieces: u32,
}
