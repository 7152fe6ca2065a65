//! Tetromino definitions and the canonical color table
//!
//! The 7 standard tetrominoes in spawn orientation. Table order is
//! significant: a locked cell stores `index + 1`, and renderers map that
//! value back through [`COLOR_TABLE`].

use crate::piece::Shape;
use serde::Serialize;

/// The 7 tetromino types, in color-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

/// Display colors, one per tetromino type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceColor {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

/// Cell value `v` (1..=7) is drawn with `COLOR_TABLE[v - 1]`
pub const COLOR_TABLE: [PieceColor; 7] = [
    PieceColor::Cyan,
    PieceColor::Blue,
    PieceColor::Orange,
    PieceColor::Yellow,
    PieceColor::Green,
    PieceColor::Purple,
    PieceColor::Red,
];

impl TetrominoType {
    /// Get all tetromino types in color-table order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Get the color for this tetromino
    pub fn color(self) -> PieceColor {
        COLOR_TABLE[self.index()]
    }

    /// Value written into the grid when this piece locks (1..=7)
    pub fn cell_value(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Inverse of [`cell_value`](Self::cell_value); `None` for 0 or out of range
    pub fn from_cell_value(value: u8) -> Option<TetrominoType> {
        let index = usize::from(value).checked_sub(1)?;
        Self::all().get(index).copied()
    }

    /// Spawn-orientation shape
    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoType::L => &[&[0, 0, 1], &[1, 1, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoType::T => &[&[0, 1, 0], &[1, 1, 1]],
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1]],
        };
        Shape::from_rows(rows)
    }
}
