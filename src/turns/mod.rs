//! Turn scheduling.
//!
//! `TurnOrder` is used twice by the engine: once with per-round block sizes
//! for guessing, and once with unit weights to rotate the starting player
//! between rounds.

pub mod order;

pub use order::TurnOrder;
