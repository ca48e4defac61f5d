//! T-spin classification (three-corner rule)
//!
//! Runs on the board after the piece is merged and before full rows are swept. Only a T piece
//! whose last successful move was a rotation can score a T-spin.

use crate::board::Board;
use crate::pieces::Piece;
use crate::types::{PieceKind, Rotation, TSpinKind};

/// Corner offsets of the T's 3x3 bounding box, relative to the piece origin
const CORNERS: [(i8, i8); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

/// The two corners on the side the T points to
fn front_corners(rotation: Rotation) -> [(i8, i8); 2] {
    match rotation {
        Rotation::North => [(0, 2), (2, 2)],
        Rotation::East => [(2, 0), (2, 2)],
        Rotation::South => [(0, 0), (2, 0)],
        Rotation::West => [(0, 0), (0, 2)],
    }
}

fn is_blocked(board: &Board, x: i8, y: i8) -> bool {
    board.is_out_of_bounds(x, y) || board.is_occupied(x, y)
}

/// Number of blocked corners around the piece's bounding box
pub fn count_blocked_corners(board: &Board, piece: &Piece) -> u8 {
    CORNERS
        .iter()
        .filter(|&&(dx, dy)| is_blocked(board, piece.x + dx, piece.y + dy))
        .count() as u8
}

pub fn detect_t_spin(board: &Board, piece: &Piece) -> TSpinKind {
    if piece.kind != PieceKind::T || piece.last_rotation.is_none() {
        return TSpinKind::None;
    }

    let blocked = count_blocked_corners(board, piece);
    if blocked >= 3 {
        return TSpinKind::Full;
    }

    if blocked == 2 {
        let front_blocked = front_corners(piece.rotation)
            .iter()
            .any(|&(dx, dy)| is_blocked(board, piece.x + dx, piece.y + dy));
        if front_blocked {
            return TSpinKind::Mini;
        }
    }

    TSpinKind::None
}
