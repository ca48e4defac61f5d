//! Board tests - grid access, collision, merge and sweeps

use blockfall::core::{Board, Piece};
use blockfall::types::{EngineError, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

fn board_with(rows: &[(usize, &'static str)]) -> Board {
    let mut all = vec![".........."; BOARD_HEIGHT as usize];
    for &(y, row) in rows {
        all[y] = row;
    }
    Board::from_rows(&all).unwrap()
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_free(x, y), "Cell ({}, {}) should be free", x, y);
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();

    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));

    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));

    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, BOARD_HEIGHT as i8, Some(PieceKind::T)));
}

#[test]
fn test_collision_with_walls_and_floor() {
    let board = Board::new();

    // I piece lying flat at the left wall
    let piece = Piece::new(PieceKind::I, Rotation::North, 0, 5);
    assert!(!board.is_colliding(&piece));
    assert!(board.is_colliding_at(&piece, -1, 0));

    // Right wall
    let piece = Piece::new(PieceKind::I, Rotation::North, 6, 5);
    assert!(!board.is_colliding(&piece));
    assert!(board.is_colliding_at(&piece, 1, 0));

    // Floor: O resting on row 19
    let piece = Piece::new(PieceKind::O, Rotation::North, 4, 18);
    assert!(!board.is_colliding(&piece));
    assert!(board.is_grounded(&piece));
    assert!(board.is_colliding_at(&piece, 0, 1));
}

#[test]
fn test_rows_above_field_never_collide_with_content() {
    let board = board_with(&[(0, "JJJJJJJJJJ")]);

    // Entirely above the field
    let piece = Piece::new(PieceKind::O, Rotation::North, 4, -3);
    assert!(!board.is_colliding(&piece));

    // Lower half reaches the filled top row
    let piece = Piece::new(PieceKind::O, Rotation::North, 4, -1);
    assert!(board.is_colliding(&piece));

    // Side walls still apply above the field
    let piece = Piece::new(PieceKind::O, Rotation::North, 9, -3);
    assert!(board.is_colliding(&piece));
}

#[test]
fn test_collision_with_blocks() {
    let board = board_with(&[(10, "....S.....")]);
    let piece = Piece::new(PieceKind::T, Rotation::North, 3, 9);
    // T's bottom row covers (3..=5, 10)
    assert!(board.is_colliding(&piece));
    assert!(!board.is_colliding_at(&piece, 0, -1));
}

#[test]
fn test_drop_distance() {
    let board = board_with(&[(15, "..ZZ......")]);
    let piece = Piece::spawn(PieceKind::O);
    // O spans columns 4-5: nothing below it
    assert_eq!(board.drop_distance(&piece), 18);

    let piece = Piece::new(PieceKind::O, Rotation::North, 2, 0);
    assert_eq!(board.drop_distance(&piece), 13);
}

#[test]
fn test_sweep_two_full_rows() {
    let mut board = board_with(&[
        (14, "....L....."),
        (15, "IIIIIIIIII"),
        (16, "T.T.T.T.T."),
        (17, "OOOOOOOOOO"),
        (18, ".S.S.S.S.S"),
        (19, "Z........Z"),
    ]);

    let cleared = board.sweep_rows();
    assert_eq!(cleared.as_slice(), &[15, 17]);

    let expected = board_with(&[
        (16, "....L....."),
        (17, "T.T.T.T.T."),
        (18, ".S.S.S.S.S"),
        (19, "Z........Z"),
    ]);
    assert_eq!(board, expected);
}

#[test]
fn test_sweep_without_full_rows_is_noop() {
    let mut board = board_with(&[(19, "IIIIIIIII.")]);
    let before = board.clone();
    assert_eq!(board.sweep(), 0);
    assert_eq!(board, before);
}

#[test]
fn test_merge_writes_piece_kind() {
    let mut board = Board::new();
    let piece = Piece::new(PieceKind::L, Rotation::North, 0, 18);
    assert_eq!(board.merge(&piece), 4);
    for (x, y) in piece.cells() {
        assert_eq!(board.get(x, y), Some(Some(PieceKind::L)));
    }
}

#[test]
fn test_game_over_when_top_row_filled() {
    let board = board_with(&[(0, ".........J")]);
    assert!(board.is_game_over());
    assert!(!Board::new().is_game_over());
}

#[test]
fn test_from_cells_validates_dimensions() {
    let cells = vec![vec![None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize - 1];
    assert_eq!(
        Board::from_cells(cells),
        Err(EngineError::InvalidState("board must be 10x20"))
    );

    let mut cells = vec![vec![None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
    cells[5][3] = Some(PieceKind::O);
    let board = Board::from_cells(cells.clone()).unwrap();
    assert_eq!(board.to_cells(), cells);
}
