//! The guessing game engine.
//!
//! - `Game`: round state machine driven by player actions
//! - `GameEvent`: structured log entries
//! - `GameLog`: buffer the transport layer drains after each action
//! - `GameSnapshot`: serializable copy of a game

pub mod engine;
pub mod event;
pub mod log;
pub mod snapshot;

pub use engine::Game;
pub use event::{group_thousands, GameEvent};
pub use self::log::GameLog;
pub use snapshot::GameSnapshot;
