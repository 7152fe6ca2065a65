//! Game board representation and collision detection

use crate::piece::{Piece, Position};
use crate::tetromino::TetrominoType;
use serde::{Serialize, Serializer};

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled by a locked piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Integer form: 0 for empty, color-table index + 1 otherwise
    pub fn value(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.cell_value(),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// The grid of locked cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [EMPTY_ROW; BOARD_HEIGHT],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        let (row, col) = Self::index(row, col)?;
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some((row, col)) => {
                self.cells[row][col] = cell;
                true
            }
            None => false,
        }
    }

    fn index(row: i32, col: i32) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok().filter(|&r| r < BOARD_HEIGHT)?;
        let col = usize::try_from(col).ok().filter(|&c| c < BOARD_WIDTH)?;
        Some((row, col))
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.cells
    }

    /// The grid as integer cell values
    pub fn values(&self) -> [[u8; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.cells.map(|row| row.map(|cell| cell.value()))
    }

    /// Whether `piece` placed at `pos` overlaps a wall, the floor or a
    /// locked block. Cells above the top row never collide.
    pub fn collides(&self, piece: &Piece, pos: Position) -> bool {
        piece.cells_at(pos).any(|(row, col)| {
            if col < 0 || col >= BOARD_WIDTH as i32 {
                return true;
            }
            if row >= BOARD_HEIGHT as i32 {
                return true;
            }
            if row < 0 {
                return false;
            }
            self.cells[row as usize][col as usize].is_filled()
        })
    }

    /// A copy of this board with `piece` locked in at `pos`.
    /// Blocks above the top row are dropped.
    pub fn merged(&self, piece: &Piece, pos: Position) -> Board {
        let mut next = self.clone();
        let cell = Cell::Filled(piece.kind);
        for (row, col) in piece.cells_at(pos) {
            next.set(row, col, cell);
        }
        next
    }

    /// Clear completed lines and return the number cleared.
    ///
    /// Scans bottom to top; after removing a row the same index is
    /// checked again, since the row above has just shifted into it.
    pub fn clear_lines(&mut self) -> usize {
        let mut lines_cleared = 0;
        let mut row = BOARD_HEIGHT;

        while row > 0 {
            if self.is_line_full(row - 1) {
                self.cells.copy_within(0..row - 1, 1);
                self.cells[0] = EMPTY_ROW;
                lines_cleared += 1;
            } else {
                row -= 1;
            }
        }

        lines_cleared
    }

    /// Check if a line is completely filled
    pub fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }
}
