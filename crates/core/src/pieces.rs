//! Pieces module - tetromino shapes, rotation math and SRS wall kicks
//!
//! Every piece kind has a spawn occupancy matrix (4x4 for I, 2x2 for O, 3x3 for the rest).
//! The matrix of any other rotation state is derived from it with plain matrix math:
//!
//! - clockwise: transpose, then reverse each row
//! - counter-clockwise: transpose, then reverse the row order
//! - half turn: two clockwise turns
//!
//! Wall kicks follow the Super Rotation System. Tables are stored for the four clockwise
//! transitions only; a counter-clockwise transition reuses the table of the reverse clockwise
//! transition with every offset negated. Offsets are in board coordinates (y grows downward).
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, Rotation, RotationDirection, BOARD_WIDTH};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin, in row-major order
pub type PieceShape = [MinoOffset; 4];

/// Ordered kick candidates for one rotation transition
pub type KickOffsets = [(i8, i8); 5];

/// Kick table indexed by the clockwise transition 0->1, 1->2, 2->3, 3->0
pub type KickTable = [KickOffsets; 4];

/// Square occupancy matrix of a piece in one rotation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    size: u8,
    rows: [[bool; 4]; 4],
}

const fn pattern(size: u8, rows: [&str; 4]) -> ShapeMatrix {
    let mut out = [[false; 4]; 4];
    let mut r = 0;
    while r < 4 {
        let bytes = rows[r].as_bytes();
        let mut c = 0;
        while c < bytes.len() && c < 4 {
            out[r][c] = bytes[c] == b'#';
            c += 1;
        }
        r += 1;
    }
    ShapeMatrix { size, rows: out }
}

const SPAWN_I: ShapeMatrix = pattern(4, ["....", "####", "....", "...."]);
const SPAWN_O: ShapeMatrix = pattern(2, ["##", "##", "", ""]);
const SPAWN_T: ShapeMatrix = pattern(3, [".#.", "###", "...", ""]);
const SPAWN_S: ShapeMatrix = pattern(3, [".##", "##.", "...", ""]);
const SPAWN_Z: ShapeMatrix = pattern(3, ["##.", ".##", "...", ""]);
const SPAWN_J: ShapeMatrix = pattern(3, ["#..", "###", "...", ""]);
const SPAWN_L: ShapeMatrix = pattern(3, ["..#", "###", "...", ""]);

impl ShapeMatrix {
    /// Spawn-orientation matrix for a piece kind
    pub fn spawn(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => SPAWN_I,
            PieceKind::O => SPAWN_O,
            PieceKind::T => SPAWN_T,
            PieceKind::S => SPAWN_S,
            PieceKind::Z => SPAWN_Z,
            PieceKind::J => SPAWN_J,
            PieceKind::L => SPAWN_L,
        }
    }

    /// Side length of the square matrix
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn is_filled(&self, col: u8, row: u8) -> bool {
        col < self.size && row < self.size && self.rows[row as usize][col as usize]
    }

    fn transposed(&self) -> Self {
        let n = self.size as usize;
        let mut rows = [[false; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate().take(n) {
            for (c, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.rows[c][r];
            }
        }
        Self {
            size: self.size,
            rows,
        }
    }

    fn with_rows_reversed(mut self) -> Self {
        let n = self.size as usize;
        for row in self.rows.iter_mut().take(n) {
            row[..n].reverse();
        }
        self
    }

    fn with_row_order_reversed(mut self) -> Self {
        let n = self.size as usize;
        self.rows[..n].reverse();
        self
    }

    pub fn rotate_cw(&self) -> Self {
        self.transposed().with_rows_reversed()
    }

    pub fn rotate_ccw(&self) -> Self {
        self.transposed().with_row_order_reversed()
    }

    pub fn rotate_180(&self) -> Self {
        self.rotate_cw().rotate_cw()
    }

    /// Occupied cells as (col, row) offsets, scanned row by row
    pub fn minos(&self) -> PieceShape {
        let mut out = [(0i8, 0i8); 4];
        let mut i = 0usize;
        for r in 0..self.size {
            for c in 0..self.size {
                if self.is_filled(c, r) && i < out.len() {
                    out[i] = (c as i8, r as i8);
                    i += 1;
                }
            }
        }
        out
    }
}

/// Get the occupancy matrix for a piece kind and rotation
pub fn get_matrix(kind: PieceKind, rotation: Rotation) -> ShapeMatrix {
    let spawn = ShapeMatrix::spawn(kind);
    match rotation {
        Rotation::North => spawn,
        Rotation::East => spawn.rotate_cw(),
        Rotation::South => spawn.rotate_180(),
        Rotation::West => spawn.rotate_ccw(),
    }
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    get_matrix(kind, rotation).minos()
}

/// Get initial shape for a new piece
pub fn get_spawn_shape(kind: PieceKind) -> PieceShape {
    get_shape(kind, Rotation::North)
}

/// Width of the piece's bounding matrix
pub fn piece_width(kind: PieceKind) -> u8 {
    ShapeMatrix::spawn(kind).size()
}

/// Column of the shape origin for a freshly spawned piece
pub fn spawn_column(kind: PieceKind) -> i8 {
    ((BOARD_WIDTH - piece_width(kind)) / 2) as i8
}

/// O piece never kicks
const O_KICKS: KickTable = [[(0, 0); 5]; 4];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 1->2
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 2->3
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 3->0
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// I piece kick table
const I_KICKS: KickTable = [
    // 0->1
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 1->2
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 2->3
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 3->0
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

/// Get kick table for a piece kind
pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Kick candidates for a quarter turn starting at `from`
pub fn kick_offsets(kind: PieceKind, from: Rotation, clockwise: bool) -> KickOffsets {
    let table = get_kick_table(kind);
    if clockwise {
        return table[from.index() as usize];
    }

    // to -> from is a clockwise transition; walk it backwards.
    let to = from.rotate_ccw();
    let mut offsets = table[to.index() as usize];
    for offset in offsets.iter_mut() {
        *offset = (-offset.0, -offset.1);
    }
    offsets
}

/// Rotation recorded on a piece after a successful rotate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationMeta {
    pub direction: RotationDirection,
    /// Index of the accepted kick candidate (0 = no kick)
    pub kick_index: u8,
}

/// Result of a successful rotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOutcome {
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub kick_index: u8,
    /// Total offset applied to the origin
    pub kick: (i8, i8),
}

fn try_quarter_turn<F>(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    is_free: &F,
) -> Option<RotationOutcome>
where
    F: Fn(i8, i8) -> bool,
{
    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };
    let new_shape = get_shape(kind, new_rotation);

    for (i, &(dx, dy)) in kick_offsets(kind, rotation, clockwise).iter().enumerate() {
        let new_x = x + dx;
        let new_y = y + dy;

        let fits = new_shape
            .iter()
            .all(|&(mx, my)| is_free(new_x + mx, new_y + my));

        if fits {
            return Some(RotationOutcome {
                rotation: new_rotation,
                x: new_x,
                y: new_y,
                kick_index: i as u8,
                kick: (dx, dy),
            });
        }
    }

    None
}

/// Try to rotate a piece with wall kicks
///
/// `is_free(x, y)` reports whether a mino may occupy the absolute cell. A half turn is two
/// clockwise quarter turns, each resolved against its own kick list; the recorded kick index
/// is the one of the second turn.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    direction: RotationDirection,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<RotationOutcome> {
    match direction {
        RotationDirection::Clockwise => try_quarter_turn(kind, rotation, x, y, true, &is_free),
        RotationDirection::CounterClockwise => {
            try_quarter_turn(kind, rotation, x, y, false, &is_free)
        }
        RotationDirection::Half => {
            let first = try_quarter_turn(kind, rotation, x, y, true, &is_free)?;
            let second = try_quarter_turn(kind, first.rotation, first.x, first.y, true, &is_free)?;
            Some(RotationOutcome {
                kick: (second.x - x, second.y - y),
                ..second
            })
        }
    }
}

/// Active falling piece
///
/// The shape is never stored: it is always derived from `kind` and `rotation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Set only while the last state-changing move was a rotation
    pub last_rotation: Option<RotationMeta>,
}

impl Piece {
    pub fn new(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
            last_rotation: None,
        }
    }

    /// Create a piece at the spawn position: centered, row 0, rotation 0
    pub fn spawn(kind: PieceKind) -> Self {
        Self::new(kind, Rotation::North, spawn_column(kind), 0)
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    pub fn matrix(&self) -> ShapeMatrix {
        get_matrix(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Translated copy; a translation forgets the last rotation
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            last_rotation: None,
            ..*self
        }
    }

    /// Copy placed according to a rotation outcome
    pub fn rotated(&self, outcome: RotationOutcome, direction: RotationDirection) -> Self {
        Self {
            rotation: outcome.rotation,
            x: outcome.x,
            y: outcome.y,
            last_rotation: Some(RotationMeta {
                direction,
                kick_index: outcome.kick_index,
            }),
            ..*self
        }
    }
}
