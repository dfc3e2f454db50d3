//! Player identification and per-player game counters.
//!
//! ## PlayerId
//!
//! Opaque identifier handed in by the transport layer (a chat user id).
//! The engine only compares ids for equality.
//!
//! ## PlayerState
//!
//! Counters the engine mutates: the persistent `score` and the per-round
//! `num_guessed_roots`. Kept in a map owned by the engine, keyed by `PlayerId`.

use serde::{Deserialize, Serialize};

/// Stable player identifier supplied by the transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A player as known to the engine: identity plus display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Identity used for every turn check.
    pub id: PlayerId,

    /// Name shown in log lines.
    pub name: String,
}

impl Player {
    /// Create a new player.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Mutable counters for one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Rounds won. Survives round resets.
    pub score: u32,

    /// Roots found in the current round.
    pub num_guessed_roots: u32,
}

impl PlayerState {
    /// Clear the round-scoped counters, keeping the score.
    pub fn reset_round(&mut self) {
        self.num_guessed_roots = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p = PlayerId::new(7);
        assert_eq!(p.raw(), 7);
        assert_eq!(format!("{}", p), "Player 7");
    }

    #[test]
    fn test_player_display_uses_name() {
        let player = Player::new(1, "alice");
        assert_eq!(player.id, PlayerId::new(1));
        assert_eq!(player.to_string(), "alice");
    }

    #[test]
    fn test_player_state_reset_round_keeps_score() {
        let mut state = PlayerState {
            score: 3,
            num_guessed_roots: 2,
        };
        state.reset_round();

        assert_eq!(state.score, 3);
        assert_eq!(state.num_guessed_roots, 0);
    }

    #[test]
    fn test_player_serialization() {
        let player = Player::new(42, "bob");
        let json = serde_json::to_string(&player).unwrap();
        let deserialized: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, deserialized);
    }
}
