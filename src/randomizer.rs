//! Piece generation
//!
//! Pieces are drawn uniformly with replacement, so repeats and droughts
//! are possible. The source is a trait so games can be replayed from a
//! seed or driven by a fixed script.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Something that hands out the next tetromino to spawn
pub trait PieceSource {
    fn next_piece(&mut self) -> TetrominoType;
}

impl<S: PieceSource + ?Sized> PieceSource for Box<S> {
    fn next_piece(&mut self) -> TetrominoType {
        (**self).next_piece()
    }
}

/// Uniform draw from the 7 tetrominoes
#[derive(Debug, Clone)]
pub struct UniformRandomizer<R = ChaCha8Rng> {
    rng: R,
}

impl UniformRandomizer<ChaCha8Rng> {
    /// Randomizer seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// Reproducible randomizer: the same seed yields the same pieces
    pub fn with_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformRandomizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for UniformRandomizer<ChaCha8Rng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> PieceSource for UniformRandomizer<R> {
    fn next_piece(&mut self) -> TetrominoType {
        let all = TetrominoType::all();
        all[self.rng.gen_range(0..all.len())]
    }
}

/// Repeats a fixed sequence of pieces forever
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    pieces: Vec<TetrominoType>,
    cursor: usize,
}

impl ScriptedSource {
    /// Falls back to a single O piece when `pieces` is empty
    pub fn new(pieces: impl Into<Vec<TetrominoType>>) -> Self {
        let mut pieces = pieces.into();
        if pieces.is_empty() {
            pieces.push(TetrominoType::O);
        }
        Self { pieces, cursor: 0 }
    }
}

impl PieceSource for ScriptedSource {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.pieces[self.cursor];
        self.cursor = (self.cursor + 1) % self.pieces.len();
        piece
    }
}
