//! Piece shapes, rotation and board positions

use crate::error::Error;
use crate::tetromino::{PieceColor, TetrominoType};
use serde::Serialize;

/// One rotation state of a piece: a rectangular matrix where nonzero
/// entries are filled sub-cells
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Shape {
    rows: Vec<Vec<u8>>,
}

impl Shape {
    pub(crate) fn from_rows(rows: &[&[u8]]) -> Self {
        debug_assert!(!rows.is_empty());
        debug_assert!(rows.iter().all(|row| row.len() == rows[0].len()));
        Self {
            rows: rows.iter().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// (y, x) offsets of every filled sub-cell, top-left first
    pub fn blocks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(move |(x, _)| (y, x))
        })
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    /// Rotate 90° clockwise: transpose, then reverse each resulting row
    pub fn rotated_cw(&self) -> Shape {
        let rows = (0..self.width())
            .map(|x| self.rows.iter().rev().map(|row| row[x]).collect())
            .collect();
        Shape { rows }
    }
}

/// A piece: shape in its current rotation plus the type that colors it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Piece {
    pub kind: TetrominoType,
    pub shape: Shape,
}

impl Piece {
    /// Create a piece in spawn orientation
    pub fn new(kind: TetrominoType) -> Self {
        Self {
            kind,
            shape: kind.shape(),
        }
    }

    pub fn color(&self) -> PieceColor {
        self.kind.color()
    }

    pub fn cell_value(&self) -> u8 {
        self.kind.cell_value()
    }

    /// A new piece of the same type rotated clockwise; `self` is untouched
    pub fn rotated(&self) -> Piece {
        Piece {
            kind: self.kind,
            shape: self.shape.rotated_cw(),
        }
    }

    /// Absolute (row, col) of every block when the shape's top-left is at `pos`
    pub fn cells_at(&self, pos: Position) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .blocks()
            .map(move |(y, x)| (pos.row + y as i32, pos.col + x as i32))
    }
}

/// Grid coordinate of a shape's top-left cell. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub const fn offset(self, rows: i32, cols: i32) -> Self {
        Self {
            row: self.row + rows,
            col: self.col + cols,
        }
    }
}

/// Lateral movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta: -1 for left, +1 for right
    pub fn offset(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = Error;

    fn try_from(offset: i32) -> Result<Self, Self::Error> {
        match offset {
            -1 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            other => Err(Error::InvalidDirection(other)),
        }
    }
}
