//! Crate error type

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lateral move was requested with an offset other than -1 or +1
    #[error("invalid move direction {0}, expected -1 or 1")]
    InvalidDirection(i32),
    /// The platform config directory could not be determined
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    ParseSettings(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    SerializeSettings(#[from] toml::ser::Error),
}
