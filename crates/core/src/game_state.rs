//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, queue, lock delay and scoring.
//! It handles gravity, piece movement, rotation, holds, line clears and the game lifecycle.
//!
//! Mutating methods come in two flavours:
//! - `try_*` return `Result<bool, EngineError>`: `Ok(false)` for an inapplicable action,
//!   `Err` only for fatal errors.
//! - the plain versions (`apply_action`, `tick`) return `bool` and turn a fatal error into
//!   game over.

use log::{debug, error, info, trace};

use crate::board::{Board, ClearedRows};
use crate::config::EngineConfig;
use crate::lock_delay::LockDelay;
use crate::pieces::{try_rotate, Piece};
use crate::rng::PieceQueue;
use crate::scoring::{
    calculate_drop_score, calculate_level, calculate_score, get_drop_interval_ms, next_combo,
    ScoreResult,
};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, GameSummary, LockSnapshot};
use crate::tspin::detect_t_spin;
use crate::types::{
    EngineError, GameAction, LockState, PieceKind, RotationDirection, TSpinKind,
};

/// What happened when the last piece locked
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockEvent {
    pub piece: PieceKind,
    pub lines_cleared: u8,
    /// Original indices of the removed rows, top to bottom
    pub cleared_rows: ClearedRows,
    pub tspin: TSpinKind,
    pub score: ScoreResult,
    pub combo: u32,
    pub back_to_back: bool,
    /// Hard drop points awarded by the move that caused the lock
    pub drop_points: u32,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    current: Option<Piece>,
    queue: PieceQueue,
    held: Option<PieceKind>,
    can_hold: bool,
    score: u32,
    level: u32,
    lines: u32,
    /// Consecutive locks that cleared at least one line
    combo: u32,
    /// Whether the previous lock was a difficult clear
    back_to_back: bool,
    last_tspin: TSpinKind,
    lock: LockDelay,
    /// Gravity accumulator while airborne
    drop_timer_ms: u32,
    /// Monotonic id of the current piece (increments on every spawn)
    piece_id: u32,
    pieces_locked: u32,
    last_event: Option<LockEvent>,
    game_over: bool,
    paused: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed and default tuning
    pub fn new(seed: u32) -> Self {
        Self::fresh(EngineConfig::with_seed(seed), Board::new())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::fresh(config, Board::new()))
    }

    /// Start from a prepared board; the first piece spawns as usual
    pub fn with_board(config: EngineConfig, board: Board) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::fresh(config, board))
    }

    /// Start from a prepared board and current piece
    ///
    /// The queue is seeded from `config` and left untouched. A piece overlapping the board is
    /// rejected as [`EngineError::InvalidState`].
    pub fn from_position(
        config: EngineConfig,
        board: Board,
        piece: Piece,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let mut state = Self::empty(config, board);
        state.current = Some(piece);
        state.piece_id = 1;
        state.lock.on_spawn(state.board.is_grounded(&piece));
        state.validate()?;
        Ok(state)
    }

    fn empty(config: EngineConfig, board: Board) -> Self {
        Self {
            config,
            board,
            current: None,
            queue: PieceQueue::new(config.seed, config.preview_count as usize),
            held: None,
            can_hold: true,
            score: 0,
            level: calculate_level(0),
            lines: 0,
            combo: 0,
            back_to_back: false,
            last_tspin: TSpinKind::None,
            lock: LockDelay::new(config.lock_delay_ms, config.max_lock_resets),
            drop_timer_ms: 0,
            piece_id: 0,
            pieces_locked: 0,
            last_event: None,
            game_over: false,
            paused: false,
        }
    }

    fn fresh(config: EngineConfig, board: Board) -> Self {
        let mut state = Self::empty(config, board);
        if let Err(err) = state.spawn_next() {
            error!("initial spawn failed: {err}");
            state.end_game();
        }
        state
    }

    /// Start over with an empty board, continuing the randomizer sequence
    pub fn restart(&mut self) {
        let config = EngineConfig {
            seed: self.queue.seed(),
            ..self.config
        };
        info!("restart (seed {})", config.seed);
        *self = Self::fresh(config, Board::new());
    }

    /// Check the invariants a state must satisfy at the engine boundary
    pub fn validate(&self) -> Result<(), EngineError> {
        self.config.validate()?;
        if self.queue.len() < self.config.preview_count as usize {
            return Err(EngineError::InvalidState("queue shorter than preview"));
        }
        if self.lock.resets() > self.config.max_lock_resets {
            return Err(EngineError::InvalidState("lock reset counter over maximum"));
        }
        if !self.game_over {
            let piece = self
                .current
                .ok_or(EngineError::InvalidState("missing current piece"))?;
            if self.board.is_colliding(&piece) {
                return Err(EngineError::InvalidState(
                    "current piece collides with the board",
                ));
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn preview(&self) -> &[PieceKind] {
        self.queue.preview()
    }

    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn last_tspin(&self) -> TSpinKind {
        self.last_tspin
    }

    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    pub fn lock_timer_ms(&self) -> u32 {
        self.lock.timer_ms()
    }

    pub fn lock_resets(&self) -> u8 {
        self.lock.resets()
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get current gravity interval based on level
    pub fn drop_interval_ms(&self) -> u32 {
        get_drop_interval_ms(self.level)
    }

    /// Check if the current piece is on the ground
    pub fn is_grounded(&self) -> bool {
        self.current
            .map_or(false, |piece| self.board.is_grounded(&piece))
    }

    /// Landing copy of the current piece
    pub fn ghost(&self) -> Option<Piece> {
        let piece = self.current?;
        let distance = self.board.drop_distance(&piece) as i8;
        Some(Piece {
            y: piece.y + distance,
            ..piece
        })
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        self.ghost().map(|ghost| ghost.y)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            lines: self.lines,
            level: self.level,
            pieces: self.pieces_locked,
        }
    }

    pub fn last_event(&self) -> Option<&LockEvent> {
        self.last_event.as_ref()
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.current.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.hold = self.held;
        out.can_hold = self.can_hold;
        out.next_queue.clear();
        out.next_queue
            .extend(self.queue.preview().iter().copied());
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.combo = self.combo;
        out.back_to_back = self.back_to_back;
        out.last_tspin = self.last_tspin;
        out.lock = LockSnapshot {
            state: self.lock.state(),
            timer_ms: self.lock.timer_ms(),
            resets: self.lock.resets(),
        };
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.piece_id = self.piece_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.current = None;
        info!(
            "game over: score {} lines {} level {}",
            self.score, self.lines, self.level
        );
    }

    /// Place a piece of `kind` at the spawn position
    fn spawn(&mut self, kind: PieceKind) {
        let piece = Piece::spawn(kind);
        self.drop_timer_ms = 0;

        if self.board.is_colliding(&piece) {
            debug!("spawn of {kind:?} blocked");
            self.end_game();
            return;
        }

        self.current = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        self.lock.on_spawn(self.board.is_grounded(&piece));
        debug!("spawned {kind:?} (piece {})", self.piece_id);
    }

    /// Spawn the next piece from the queue
    fn spawn_next(&mut self) -> Result<(), EngineError> {
        let kind = self.queue.pop()?;
        self.spawn(kind);
        Ok(())
    }

    fn active_piece(&self) -> Result<Piece, EngineError> {
        self.current
            .ok_or(EngineError::InvalidState("missing current piece"))
    }

    /// Translate the current piece
    fn shift(&mut self, dx: i8, dy: i8) -> Result<(), EngineError> {
        let piece = self.active_piece()?;
        let moved = piece.shifted(dx, dy);
        if self.board.is_colliding(&moved) {
            return Err(EngineError::InvalidTransition("blocked"));
        }

        let was_grounded = self.board.is_grounded(&piece);
        let grounded_now = self.board.is_grounded(&moved);
        self.current = Some(moved);

        if dy == 0 {
            self.lock.on_move(was_grounded, grounded_now);
        } else {
            self.lock.on_fall(grounded_now);
        }
        Ok(())
    }

    fn rotate(&mut self, direction: RotationDirection) -> Result<(), EngineError> {
        let piece = self.active_piece()?;
        if piece.kind == PieceKind::O {
            return Err(EngineError::InvalidTransition("o piece does not rotate"));
        }

        let board = &self.board;
        let outcome = try_rotate(
            piece.kind,
            piece.rotation,
            piece.x,
            piece.y,
            direction,
            |x, y| board.is_free(x, y),
        );

        let Some(outcome) = outcome else {
            self.current = Some(Piece {
                last_rotation: None,
                ..piece
            });
            return Err(EngineError::InvalidTransition("no kick fits"));
        };

        let was_grounded = self.board.is_grounded(&piece);
        let rotated = piece.rotated(outcome, direction);
        let grounded_now = self.board.is_grounded(&rotated);
        self.current = Some(rotated);
        self.lock.on_move(was_grounded, grounded_now);
        Ok(())
    }

    fn hard_drop(&mut self) -> Result<(), EngineError> {
        let piece = self.active_piece()?;
        let distance = self.board.drop_distance(&piece);
        if distance > 0 {
            self.current = Some(piece.shifted(0, distance as i8));
        }

        let drop_points = calculate_drop_score(distance as u32, true);
        self.score = self.score.saturating_add(drop_points);
        self.lock.force_lock();
        self.lock_current(drop_points)
    }

    fn hold(&mut self) -> Result<(), EngineError> {
        if !self.can_hold {
            return Err(EngineError::InvalidTransition("hold already used"));
        }
        let piece = self.active_piece()?;

        match self.held.replace(piece.kind) {
            Some(held_kind) => self.spawn(held_kind),
            None => self.spawn_next()?,
        }
        self.can_hold = false;
        debug!("held {:?}", piece.kind);
        Ok(())
    }

    /// Merge the current piece, clear lines, score and spawn the next piece
    fn lock_current(&mut self, drop_points: u32) -> Result<(), EngineError> {
        let piece = self.active_piece()?;
        self.current = None;

        self.board.merge(&piece);
        let tspin = detect_t_spin(&self.board, &piece);
        let cleared_rows = self.board.sweep_rows();
        let lines_cleared = cleared_rows.len();

        self.combo = next_combo(self.combo, lines_cleared);
        let result = calculate_score(
            lines_cleared,
            self.level,
            tspin,
            self.combo,
            self.back_to_back,
        );
        self.score = self.score.saturating_add(result.total);
        self.back_to_back = result.difficult;

        self.lines = self.lines.saturating_add(lines_cleared as u32);
        self.level = calculate_level(self.lines);
        self.last_tspin = tspin;
        self.pieces_locked = self.pieces_locked.wrapping_add(1);

        if lines_cleared > 0 {
            debug!(
                "cleared {lines_cleared} line(s), tspin {tspin:?}, +{} (combo {}, b2b {})",
                result.total, self.combo, result.b2b_applied
            );
        }

        self.last_event = Some(LockEvent {
            piece: piece.kind,
            lines_cleared: lines_cleared as u8,
            cleared_rows,
            tspin,
            score: result,
            combo: self.combo,
            back_to_back: self.back_to_back,
            drop_points,
        });

        self.can_hold = true;
        self.spawn_next()
    }

    fn perform(&mut self, action: GameAction) -> Result<(), EngineError> {
        if self.game_over {
            return Err(EngineError::InvalidTransition("game is over"));
        }
        if action == GameAction::Pause {
            self.paused = !self.paused;
            debug!("paused: {}", self.paused);
            return Ok(());
        }
        if self.paused {
            return Err(EngineError::InvalidTransition("game is paused"));
        }

        match action {
            GameAction::MoveLeft => self.shift(-1, 0),
            GameAction::MoveRight => self.shift(1, 0),
            GameAction::SoftDrop => {
                self.shift(0, 1)?;
                self.score = self
                    .score
                    .saturating_add(calculate_drop_score(1, false));
                Ok(())
            }
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw | GameAction::RotateCcw | GameAction::Rotate180 => {
                let direction = action
                    .rotation_direction()
                    .ok_or(EngineError::InvalidState("not a rotation"))?;
                self.rotate(direction)
            }
            GameAction::Hold => self.hold(),
            GameAction::Pause => Ok(()),
        }
    }

    /// Why `action` would be rejected right now, if it would be
    pub fn check_action(&self, action: GameAction) -> Result<(), EngineError> {
        self.clone().perform(action)
    }

    /// Apply a game action
    ///
    /// Returns `Ok(false)` when the action does not apply (blocked move, hold already used,
    /// paused or finished game). A rejected rotation also forgets the previous rotation.
    pub fn try_apply_action(&mut self, action: GameAction) -> Result<bool, EngineError> {
        match self.perform(action) {
            Ok(()) => Ok(true),
            Err(EngineError::InvalidTransition(reason)) => {
                trace!("{} ignored: {reason}", action.as_str());
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Apply a game action; a fatal error ends the game
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match self.try_apply_action(action) {
            Ok(changed) => changed,
            Err(err) => {
                error!("{} failed: {err}", action.as_str());
                self.end_game();
                false
            }
        }
    }

    /// Advance gravity and lock delay by `delta_ms`
    ///
    /// Returns whether the piece moved or locked. At most one lock happens per call.
    pub fn try_tick(&mut self, delta_ms: u32) -> Result<bool, EngineError> {
        if self.paused || self.game_over {
            return Ok(false);
        }
        let Some(piece) = self.current else {
            return Ok(false);
        };

        if self.board.is_grounded(&piece) {
            self.lock.on_fall(true);
            if self.lock.advance(delta_ms) {
                self.lock_current(0)?;
                return Ok(true);
            }
            return Ok(false);
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(delta_ms);
        let interval = self.drop_interval_ms();
        let mut moved = false;

        while self.drop_timer_ms >= interval {
            self.drop_timer_ms -= interval;
            let Some(piece) = self.current else {
                break;
            };

            let fallen = piece.shifted(0, 1);
            self.current = Some(fallen);
            moved = true;

            let grounded = self.board.is_grounded(&fallen);
            self.lock.on_fall(grounded);
            if grounded {
                self.drop_timer_ms = 0;
                break;
            }
        }

        Ok(moved)
    }

    /// Main game tick; a fatal error ends the game
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        match self.try_tick(delta_ms) {
            Ok(changed) => changed,
            Err(err) => {
                error!("tick failed: {err}");
                self.end_game();
                false
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
