//! # polyguess
//!
//! Engine for a multiplayer number-guessing game played in group chats.
//!
//! A hidden polynomial `f(x) = (x - r_1)...(x - r_n)` with integer roots is
//! drawn each round. Players take turns guessing integers; every guess shows
//! `f(x)`, and hitting a root nobody found yet scores.
//!
//! ## Design Principles
//!
//! 1. **Transport-Agnostic**: No chat protocol, parsing of commands or
//!    persistence. The embedding bot forwards `(player, number)` actions and
//!    drains the event log afterwards.
//!
//! 2. **Deterministic**: All randomness flows through a seeded `GameRng`, so
//!    games replay exactly and tests can fix the roots.
//!
//! 3. **Mistakes Are Events**: Out-of-turn or out-of-range actions are
//!    reported in the log and change nothing. Only caller bugs are `Err`.
//!
//! ## Modules
//!
//! - `core`: Player ids and counters, RNG, settings, errors
//! - `polynomial`: The hidden `RootFunction`
//! - `turns`: Weighted round-robin `TurnOrder`
//! - `game`: The `Game` engine, its events and snapshots
//!
//! ## Example
//!
//! ```
//! use polyguess::{Game, GameRng, GameSettings, Player, PlayerId, RootFunction};
//!
//! let players = vec![Player::new(1, "alice"), Player::new(2, "bob")];
//! let mut game = Game::with_rng(players, GameSettings::default(), GameRng::new(7)).unwrap();
//! game.start_round_with(RootFunction::from_roots([3, 7, 11, 20], 0, 100)).unwrap();
//! game.drain_log();
//!
//! game.submit_guess(PlayerId::new(1), 50).unwrap();
//! assert_eq!(game.current_player(), PlayerId::new(2));
//! assert!(game.drain_log().starts_with("alice guessed f(50) = "));
//! ```

pub mod core;
pub mod polynomial;
pub mod turns;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    GameError, GameRng, GameRngState, GameSettings, Player, PlayerId, PlayerState, SettingKey,
    SettingValue, SettingsError, TurnOrderError,
};

pub use crate::polynomial::RootFunction;

pub use crate::turns::TurnOrder;

pub use crate::game::{Game, GameEvent, GameLog, GameSnapshot};
