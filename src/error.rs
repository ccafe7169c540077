use std::error::Error as StdError;

use thiserror::Error;

/// Cueline's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Cueline's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    /// A cue carried a timestamp the SRT format cannot represent
    /// (negative, non-finite, or `end < start`). Surfaced rather than clamped
    /// so callers never ship a silently corrected subtitle file.
    #[error("invalid cue timing for cue {index}: {start_seconds}s --> {end_seconds}s")]
    InvalidCueTiming {
        index: u32,
        start_seconds: f32,
        end_seconds: f32,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Other(Box::new(err))
    }
}
