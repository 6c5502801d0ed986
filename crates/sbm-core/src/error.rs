//! Error types for the rules engine.

use thiserror::Error;

/// Result type for engine-level parsing and validation.
pub type SbmResult<T> = Result<T, SbmError>;

/// Errors raised while interpreting player input.
///
/// Game commands themselves never fail: a command that does not fit the
/// current phase is ignored. These errors cover the text boundary.
#[derive(Debug, Error)]
pub enum SbmError {
    /// The game mode name is not recognised.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// The power-up name is not recognised.
    #[error("unknown power-up: {0}")]
    UnknownPowerUp(String),

    /// The track type is not in the track type table.
    #[error("unknown track type: {0}")]
    UnknownTrackType(String),

    /// The run tag is not in the tag list.
    #[error("unknown run tag: {0}")]
    UnknownTag(String),

    /// The input line is not a known command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Invalid choice or input.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),
}
