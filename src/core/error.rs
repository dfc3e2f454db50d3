//! Error types.
//!
//! Only caller bugs surface as `Err`. Mistakes made by players (guessing out
//! of turn, out of range, asking for too many guesses) are reported through
//! the game log instead.

use thiserror::Error;

use super::PlayerId;

/// Errors raised while building or steering a `TurnOrder`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnOrderError {
    #[error("invalid turn order: {0}")]
    InvalidConfig(String),

    #[error("{0} is not part of this turn order")]
    NotAMember(PlayerId),
}

/// Errors raised when reading or writing a named setting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Parameter does not exist: {0}")]
    UnknownSetting(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Cannot set {name}: {reason}")]
    OutOfBounds { name: String, reason: String },
}

/// Errors that can cross the engine boundary.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("{0} is already registered")]
    DuplicatePlayer(PlayerId),

    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    TurnOrder(#[from] TurnOrderError),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}
