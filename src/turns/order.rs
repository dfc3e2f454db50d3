//! Weighted round-robin turn order.
//!
//! Each player appears `weight` times in a row in an expanded schedule, and
//! the schedule repeats forever. The current position is an index into the
//! expanded array, so stepping and lookahead never allocate.
//!
//! ```
//! use polyguess::core::PlayerId;
//! use polyguess::turns::TurnOrder;
//!
//! let (a, b) = (PlayerId::new(1), PlayerId::new(2));
//! let mut order = TurnOrder::new(&[a, b], &[2, 1]).unwrap();
//!
//! assert_eq!(order.current_player(), a);
//! assert_eq!(order.num_remaining_guesses(), 2);
//! order.next_turn();
//! assert_eq!(order.current_player(), a);
//! assert!(!order.is_first_turn());
//! order.next_turn();
//! assert_eq!(order.current_player(), b);
//! assert!(order.is_first_turn());
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, TurnOrderError};

/// Repeating schedule of player turns with per-player block sizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    /// Players in seating order.
    players: Vec<PlayerId>,

    /// Consecutive turns per cycle, parallel to `players`.
    weights: Vec<u32>,

    /// `players` expanded by `weights`; one cycle of the schedule.
    schedule: Vec<PlayerId>,

    /// Index of the current turn in `schedule`.
    position: usize,

    /// True exactly on the first turn of the current player's block.
    first_turn: bool,
}

impl TurnOrder {
    /// Build a turn order where `players[i]` takes `turns_per_player[i]`
    /// consecutive turns before play passes on.
    ///
    /// The first player of the expanded schedule starts, on their first turn.
    pub fn new(players: &[PlayerId], turns_per_player: &[u32]) -> Result<Self, TurnOrderError> {
        if players.is_empty() {
            return Err(TurnOrderError::InvalidConfig("no players".to_string()));
        }
        if players.len() != turns_per_player.len() {
            return Err(TurnOrderError::InvalidConfig(format!(
                "{} players but {} weights",
                players.len(),
                turns_per_player.len()
            )));
        }
        if let Some(index) = turns_per_player.iter().position(|&w| w == 0) {
            return Err(TurnOrderError::InvalidConfig(format!(
                "{} has no turns",
                players[index]
            )));
        }

        let schedule = players
            .iter()
            .zip(turns_per_player)
            .flat_map(|(&player, &weight)| std::iter::repeat(player).take(weight as usize))
            .collect();

        Ok(Self {
            players: players.to_vec(),
            weights: turns_per_player.to_vec(),
            schedule,
            position: 0,
            first_turn: true,
        })
    }

    /// Build a turn order where every player has the same block size.
    pub fn uniform(players: &[PlayerId], turns: u32) -> Result<Self, TurnOrderError> {
        Self::new(players, &vec![turns; players.len()])
    }

    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.schedule[self.position]
    }

    /// Whether it is `player`'s turn.
    #[must_use]
    pub fn is_players_turn(&self, player: PlayerId) -> bool {
        self.current_player() == player
    }

    /// Whether this is the first turn of the current player's block.
    #[must_use]
    pub fn is_first_turn(&self) -> bool {
        self.first_turn
    }

    /// Players in seating order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Block sizes, parallel to `players()`.
    #[must_use]
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Number of turns in one full cycle.
    #[must_use]
    pub fn cycle_len(&self) -> usize {
        self.schedule.len()
    }

    /// Whether `player` takes part in this order.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Advance to the next turn of the schedule.
    pub fn next_turn(&mut self) {
        let previous = self.current_player();
        self.position = (self.position + 1) % self.schedule.len();
        self.first_turn = self.current_player() != previous;
    }

    /// Advance, then return the new current player.
    pub fn player_and_make_turn(&mut self) -> PlayerId {
        self.next_turn();
        self.current_player()
    }

    /// Advance until it is `player`'s turn.
    ///
    /// Shifts the phase of the cycle without touching the weights.
    pub fn set_player(&mut self, player: PlayerId) -> Result<(), TurnOrderError> {
        if !self.contains(player) {
            return Err(TurnOrderError::NotAMember(player));
        }
        while self.current_player() != player {
            self.next_turn();
        }
        Ok(())
    }

    /// Check that the schedule is `players` expanded by `weights` and that
    /// the position points into it.
    ///
    /// Orders built through `new` always pass; deserialized ones may not.
    pub fn validate(&self) -> Result<(), TurnOrderError> {
        let invalid = |reason: String| Err(TurnOrderError::InvalidConfig(reason));

        if self.players.is_empty() {
            return invalid("no players".to_string());
        }
        if self.players.len() != self.weights.len() {
            return invalid(format!(
                "{} players but {} weights",
                self.players.len(),
                self.weights.len()
            ));
        }
        if let Some(index) = self.weights.iter().position(|&w| w == 0) {
            return invalid(format!("{} has no turns", self.players[index]));
        }

        let expected_len = self
            .weights
            .iter()
            .try_fold(0usize, |len, &w| len.checked_add(w as usize));
        if expected_len != Some(self.schedule.len()) {
            return invalid(format!(
                "schedule has {} turns, weights need {:?}",
                self.schedule.len(),
                expected_len
            ));
        }
        let expanded = self
            .players
            .iter()
            .zip(&self.weights)
            .flat_map(|(&player, &weight)| std::iter::repeat(player).take(weight as usize));
        if !expanded.eq(self.schedule.iter().copied()) {
            return invalid("schedule does not match weights".to_string());
        }
        if self.position >= self.schedule.len() {
            return invalid(format!(
                "position {} outside a cycle of {}",
                self.position,
                self.schedule.len()
            ));
        }
        Ok(())
    }

    /// Number of consecutive turns the current player has left, including
    /// the current one. Looks ahead at most one full cycle.
    #[must_use]
    pub fn num_remaining_guesses(&self) -> usize {
        let current = self.current_player();
        let len = self.schedule.len();
        1 + (1..len)
            .map(|offset| self.schedule[(self.position + offset) % len])
            .take_while(|&player| player == current)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u64) -> Vec<PlayerId> {
        (0..n).map(PlayerId::new).collect()
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            TurnOrder::new(&[], &[]),
            Err(TurnOrderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_weight() {
        let players = ids(2);
        assert!(matches!(
            TurnOrder::new(&players, &[1, 0]),
            Err(TurnOrderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let players = ids(3);
        assert!(TurnOrder::new(&players, &[1, 1]).is_err());
    }

    #[test]
    fn test_uniform_cycles() {
        let players = ids(3);
        let mut order = TurnOrder::uniform(&players, 1).unwrap();

        let seen: Vec<_> = (0..6).map(|_| order.player_and_make_turn()).collect();
        assert_eq!(
            seen,
            vec![players[1], players[2], players[0], players[1], players[2], players[0]]
        );
        assert!(order.is_first_turn());
    }

    #[test]
    fn test_set_player() {
        let players = ids(3);
        let mut order = TurnOrder::new(&players, &[2, 2, 2]).unwrap();

        order.set_player(players[2]).unwrap();
        assert_eq!(order.current_player(), players[2]);
        assert!(order.is_first_turn());
        assert_eq!(order.num_remaining_guesses(), 2);
        assert_eq!(order.weights(), &[2, 2, 2]);
    }

    #[test]
    fn test_set_player_not_member() {
        let mut order = TurnOrder::uniform(&ids(2), 1).unwrap();
        assert_eq!(
            order.set_player(PlayerId::new(99)),
            Err(TurnOrderError::NotAMember(PlayerId::new(99)))
        );
        assert_eq!(order.current_player(), PlayerId::new(0));
    }

    #[test]
    fn test_single_player_blocks_never_restart() {
        let mut order = TurnOrder::new(&ids(1), &[3]).unwrap();
        assert_eq!(order.num_remaining_guesses(), 3);

        order.next_turn();
        assert!(!order.is_first_turn());
        order.next_turn();
        order.next_turn();
        // Wrapped around to the same player: not a new block.
        assert!(!order.is_first_turn());
        assert_eq!(order.num_remaining_guesses(), 3);
    }

    #[test]
    fn test_remaining_guesses_counts_down() {
        let players = ids(2);
        let mut order = TurnOrder::new(&players, &[4, 1]).unwrap();

        for expected in (1..=4).rev() {
            assert_eq!(order.current_player(), players[0]);
            assert_eq!(order.num_remaining_guesses(), expected);
            order.next_turn();
        }
        assert_eq!(order.current_player(), players[1]);
        assert_eq!(order.num_remaining_guesses(), 1);
    }

    #[test]
    fn test_validate() {
        let players = ids(2);
        let mut order = TurnOrder::new(&players, &[2, 1]).unwrap();
        order.next_turn();
        assert!(order.validate().is_ok());

        let mut bad = order.clone();
        bad.position = 3;
        assert!(matches!(bad.validate(), Err(TurnOrderError::InvalidConfig(_))));

        let mut bad = order.clone();
        bad.weights = vec![1, 2];
        assert!(bad.validate().is_err());

        let mut bad = order.clone();
        bad.schedule.clear();
        bad.position = 0;
        assert!(bad.validate().is_err());

        let mut bad = order;
        bad.players.pop();
        assert!(bad.validate().is_err());
    }
}
