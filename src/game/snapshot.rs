//! Serializable game snapshots.
//!
//! A snapshot holds everything needed to resume a game except the pending
//! log. Storing the bytes is left to the caller.

use im::OrdSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{GameError, GameRngState, GameSettings, Player, PlayerId, PlayerState};
use crate::polynomial::RootFunction;
use crate::turns::TurnOrder;

/// Full state of a `Game`, minus the log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub settings: GameSettings,
    pub players: Vec<Player>,
    pub states: FxHashMap<PlayerId, PlayerState>,
    pub function: RootFunction,
    pub roots_to_guess: OrdSet<i64>,
    pub guessed_values: OrdSet<i64>,
    pub num_roots_to_guess_down_to: u32,
    pub turn_order: TurnOrder,
    pub starting_player_order: TurnOrder,
    pub rng: GameRngState,
}

impl GameSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GameError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
