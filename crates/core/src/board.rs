//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Cells above the visible field (y < 0) are treated as free space so a piece may poke
//! out of the top while it is still moving. The other three edges are walls.

use std::fmt;

use arrayvec::ArrayVec;

use crate::pieces::{Piece, PieceShape};
use crate::types::{Cell, EngineError, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
pub const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices removed by a single sweep, top to bottom
pub type ClearedRows = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a mino may occupy (x, y)
    ///
    /// Free means: inside the side walls, above the floor, and either above the visible
    /// field or on an empty cell.
    #[inline]
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        y < 0 || matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds (any edge, including above the field)
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// Whether a shape placed with its origin at (x, y) overlaps a wall, the floor or a block
    pub fn collides(&self, shape: &PieceShape, x: i8, y: i8) -> bool {
        shape
            .iter()
            .any(|&(dx, dy)| !self.is_free(x + dx, y + dy))
    }

    pub fn is_colliding(&self, piece: &Piece) -> bool {
        self.collides(&piece.shape(), piece.x, piece.y)
    }

    /// Collision test for the piece translated by (dx, dy)
    pub fn is_colliding_at(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        self.collides(&piece.shape(), piece.x + dx, piece.y + dy)
    }

    /// A piece is grounded when moving it one row down would collide
    pub fn is_grounded(&self, piece: &Piece) -> bool {
        self.is_colliding_at(piece, 0, 1)
    }

    /// Number of rows the piece can fall before it becomes grounded
    pub fn drop_distance(&self, piece: &Piece) -> u8 {
        let shape = piece.shape();
        let mut distance: u8 = 0;
        // The floor bounds the loop; the extra margin covers pieces spawned above the field.
        while distance <= BOARD_HEIGHT + 4
            && !self.collides(&shape, piece.x, piece.y + distance as i8 + 1)
        {
            distance += 1;
        }
        distance
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Write the piece's minos into the grid
    ///
    /// Minos outside the field are skipped. Returns how many cells were written.
    pub fn merge(&mut self, piece: &Piece) -> u8 {
        let mut written = 0;
        for (x, y) in piece.cells() {
            if self.set(x, y, Some(piece.kind)) {
                written += 1;
            }
        }
        written
    }

    /// Remove all full rows, shifting the rest down. Returns the number removed.
    pub fn sweep(&mut self) -> usize {
        self.sweep_rows().len()
    }

    /// Remove all full rows and return their original indices (top to bottom)
    /// Uses a two-pointer algorithm with zero-allocation
    pub fn sweep_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        // Scan from bottom to top
        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared.push(read_y as u8);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Fresh empty rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared.reverse();
        cleared
    }

    /// Anything resting in the top row. Game over itself is decided by spawn collision.
    pub fn is_game_over(&self) -> bool {
        self.cells[..BOARD_WIDTH as usize]
            .iter()
            .any(|cell| cell.is_some())
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }

    /// Write the grid as piece codes (0 = empty, 1..=7 = I,O,T,S,Z,J,L)
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            let start = y * width;
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = self.cells[start + x].map_or(0, |kind| kind.code());
            }
        }
    }

    /// Build a board from 20 text rows of 10 symbols
    ///
    /// `.` is empty; a piece letter (`IOTSZJL`, any case) is a filled cell.
    pub fn from_rows(rows: &[&str]) -> Result<Self, EngineError> {
        if rows.len() != BOARD_HEIGHT as usize {
            return Err(EngineError::InvalidState("board must have 20 rows"));
        }

        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != BOARD_WIDTH as usize {
                return Err(EngineError::InvalidState("board rows must have 10 columns"));
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    other => {
                        let mut buf = [0u8; 4];
                        let kind = PieceKind::from_str(other.encode_utf8(&mut buf))
                            .ok_or(EngineError::InvalidState("unknown board symbol"))?;
                        Some(kind)
                    }
                };
                board.cells[y * BOARD_WIDTH as usize + x] = cell;
            }
        }
        Ok(board)
    }

    /// Build a board from a 2D grid, validating its dimensions
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Result<Self, EngineError> {
        if cells_2d.len() != BOARD_HEIGHT as usize
            || cells_2d.iter().any(|row| row.len() != BOARD_WIDTH as usize)
        {
            return Err(EngineError::InvalidState("board must be 10x20"));
        }

        let mut flat = [None; BOARD_SIZE];
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                flat[y * BOARD_WIDTH as usize + x] = *cell;
            }
        }
        Ok(Self { cells: flat })
    }

    /// Convert to 2D vector for testing/display
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.cells
            .chunks(BOARD_WIDTH as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(BOARD_WIDTH as usize) {
            for cell in row {
                let symbol = cell.map_or('.', |kind| {
                    kind.as_str().chars().next().unwrap_or('#').to_ascii_uppercase()
                });
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        fmt::Display::fmt(self, f)?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    fn empty_rows() -> Vec<&'static str> {
        vec![".........."; BOARD_HEIGHT as usize]
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_space_above_field_is_free() {
        let board = Board::new();
        assert!(board.is_free(0, -1));
        assert!(board.is_free(9, -3));
        assert!(!board.is_free(-1, -1));
        assert!(!board.is_free(10, 0));
        assert!(!board.is_free(0, 20));
    }

    #[test]
    fn test_merge_skips_out_of_field_cells() {
        let mut board = Board::new();
        // Vertical I poking above the top edge
        let piece = Piece::new(PieceKind::I, Rotation::East, 0, -2);
        assert_eq!(board.merge(&piece), 2);
        assert!(board.is_occupied(2, 0));
        assert!(board.is_occupied(2, 1));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_sweep_two_rows_shifts_remaining() {
        let mut rows = empty_rows();
        rows[17] = "T.........";
        rows[18] = "IIIIIIIIII";
        rows[19] = "JJJJJJJJJJ";
        let mut board = Board::from_rows(&rows).unwrap();

        let cleared = board.sweep_rows();
        assert_eq!(cleared.as_slice(), &[18, 19]);
        assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_sweep_non_adjacent_rows() {
        let mut rows = empty_rows();
        rows[15] = "LLLLLLLLLL";
        rows[16] = "S.........";
        rows[17] = "ZZZZZZZZZZ";
        rows[18] = ".O........";
        let mut board = Board::from_rows(&rows).unwrap();

        assert_eq!(board.sweep(), 2);
        assert_eq!(board.get(0, 17), Some(Some(PieceKind::S)));
        assert_eq!(board.get(1, 18), Some(Some(PieceKind::O)));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert_eq!(
            Board::from_rows(&[".........."]),
            Err(EngineError::InvalidState("board must have 20 rows"))
        );

        let mut rows = empty_rows();
        rows[3] = "....";
        assert!(Board::from_rows(&rows).is_err());

        let mut rows = empty_rows();
        rows[3] = "....X.....";
        assert_eq!(
            Board::from_rows(&rows),
            Err(EngineError::InvalidState("unknown board symbol"))
        );
    }

    #[test]
    fn test_display_roundtrips_through_from_rows() {
        let mut rows = empty_rows();
        rows[19] = "IOTSZJL...";
        let board = Board::from_rows(&rows).unwrap();
        let text = board.to_string();
        let parsed: Vec<&str> = text.lines().collect();
        assert_eq!(Board::from_rows(&parsed).unwrap(), board);
    }

    #[test]
    fn test_u8_grid_uses_piece_codes() {
        let mut board = Board::new();
        board.set(0, 19, Some(PieceKind::I));
        board.set(9, 0, Some(PieceKind::L));
        let mut grid = [[0u8; 10]; 20];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[19][0], 1);
        assert_eq!(grid[0][9], 7);
        assert_eq!(grid[10][5], 0);
    }

    #[test]
    fn test_game_over_checks_top_row() {
        let mut board = Board::new();
        assert!(!board.is_game_over());
        board.set(4, 1, Some(PieceKind::T));
        assert!(!board.is_game_over());
        board.set(4, 0, Some(PieceKind::T));
        assert!(board.is_game_over());
    }
}
