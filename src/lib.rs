//! blockdrop - a falling-block puzzle engine
//!
//! The engine is [`GameEngine`]: feed it commands and a periodic
//! [`GameEngine::tick`], read it back through [`Snapshot`]s.

pub mod board;
pub mod error;
pub mod game;
pub mod piece;
pub mod randomizer;
pub mod score;
pub mod settings;
pub mod tetromino;
pub mod timer;

pub use error::{Error, Result};
pub use game::{Action, GameEngine, GameState, Snapshot, TickOutcome};
