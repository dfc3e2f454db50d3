//! Core types: players, RNG, settings, errors.
//!
//! This module contains the value types shared by the polynomial, the turn
//! order and the game engine.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{Player, PlayerId, PlayerState};
pub use rng::{GameRng, GameRngState};
pub use config::{GameSettings, SettingKey, SettingValue};
pub use error::{GameError, SettingsError, TurnOrderError};
