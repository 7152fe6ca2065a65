//! Scoring: a flat 100 points per cleared line

use serde::Serialize;

/// Points awarded per cleared line
pub const POINTS_PER_LINE: u64 = 100;

/// Score and running statistics for one game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
    /// Pieces locked into the board
    pub pieces: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one lock that cleared `lines` rows. The score changes once,
    /// by `lines * POINTS_PER_LINE`. Returns the points added.
    pub fn add_lock(&mut self, lines: usize) -> u64 {
        let delta = lines as u64 * POINTS_PER_LINE;
        self.points += delta;
        self.lines += lines as u32;
        self.pieces += 1;
        delta
    }
}
