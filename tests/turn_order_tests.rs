//! TurnOrder scheduling tests.
//!
//! These tests verify the weighted round-robin schedule: block sizes,
//! first-turn flags, lookahead and phase shifts.

use polyguess::core::{PlayerId, TurnOrderError};
use polyguess::turns::TurnOrder;
use proptest::prelude::*;

fn ids(n: usize) -> Vec<PlayerId> {
    (0..n as u64).map(PlayerId::new).collect()
}

/// Walk one full cycle, recording (player, first_turn) at each step.
fn one_cycle(order: &mut TurnOrder) -> Vec<(PlayerId, bool)> {
    let mut seen = vec![(order.current_player(), order.is_first_turn())];
    for _ in 1..order.cycle_len() {
        order.next_turn();
        seen.push((order.current_player(), order.is_first_turn()));
    }
    seen
}

// =============================================================================
// Examples
// =============================================================================

#[test]
fn test_weighted_schedule() {
    let players = ids(3);
    let mut order = TurnOrder::new(&players, &[1, 3, 2]).unwrap();

    let seen: Vec<_> = one_cycle(&mut order).into_iter().map(|(p, _)| p).collect();
    assert_eq!(
        seen,
        vec![players[0], players[1], players[1], players[1], players[2], players[2]]
    );

    // And it wraps back to the first player.
    order.next_turn();
    assert_eq!(order.current_player(), players[0]);
    assert!(order.is_first_turn());
}

#[test]
fn test_player_and_make_turn_advances_first() {
    let players = ids(2);
    let mut order = TurnOrder::uniform(&players, 1).unwrap();

    assert_eq!(order.player_and_make_turn(), players[1]);
    assert_eq!(order.player_and_make_turn(), players[0]);
}

#[test]
fn test_set_player_keeps_weights() {
    let players = ids(3);
    let mut order = TurnOrder::new(&players, &[3, 5, 5]).unwrap();
    order.set_player(players[1]).unwrap();

    assert_eq!(order.current_player(), players[1]);
    assert_eq!(order.num_remaining_guesses(), 5);
    assert_eq!(order.weights(), &[3, 5, 5]);
    assert_eq!(order.cycle_len(), 13);
}

#[test]
fn test_set_player_already_current_is_noop() {
    let players = ids(2);
    let mut order = TurnOrder::new(&players, &[2, 2]).unwrap();
    order.next_turn();
    assert!(!order.is_first_turn());

    order.set_player(players[0]).unwrap();
    assert!(!order.is_first_turn());
    assert_eq!(order.num_remaining_guesses(), 1);
}

#[test]
fn test_construction_errors() {
    assert!(matches!(
        TurnOrder::new(&[], &[]),
        Err(TurnOrderError::InvalidConfig(_))
    ));
    assert!(matches!(
        TurnOrder::uniform(&ids(3), 0),
        Err(TurnOrderError::InvalidConfig(_))
    ));
    assert_eq!(
        TurnOrder::uniform(&ids(2), 1)
            .unwrap()
            .set_player(PlayerId::new(5)),
        Err(TurnOrderError::NotAMember(PlayerId::new(5)))
    );
}

#[test]
fn test_serialization() {
    let mut order = TurnOrder::new(&ids(2), &[2, 1]).unwrap();
    order.next_turn();

    let json = serde_json::to_string(&order).unwrap();
    let restored: TurnOrder = serde_json::from_str(&json).unwrap();

    assert_eq!(order, restored);
    assert_eq!(restored.num_remaining_guesses(), 1);
    assert!(!restored.is_first_turn());
}

// =============================================================================
// Properties
// =============================================================================

fn weights_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..6, 1..7)
}

proptest! {
    /// Each player appears exactly `weight` times per cycle, in one block.
    #[test]
    fn prop_cycle_visits_each_player_weight_times(weights in weights_strategy()) {
        let players = ids(weights.len());
        let mut order = TurnOrder::new(&players, &weights).unwrap();
        let seen = one_cycle(&mut order);

        for (player, &weight) in players.iter().zip(&weights) {
            let count = seen.iter().filter(|(p, _)| p == player).count();
            prop_assert_eq!(count, weight as usize);
        }
    }

    /// The first-turn flag is set exactly at the start of each block.
    #[test]
    fn prop_first_turn_marks_block_start(weights in weights_strategy()) {
        let players = ids(weights.len());
        let mut order = TurnOrder::new(&players, &weights).unwrap();
        let seen = one_cycle(&mut order);

        for (i, &(player, first)) in seen.iter().enumerate() {
            let expected = i == 0 || seen[i - 1].0 != player;
            prop_assert_eq!(first, expected);
        }
    }

    /// Within a block, k steps leave `weight - k` turns.
    #[test]
    fn prop_remaining_guesses_count_down(weights in prop::collection::vec(1u32..6, 2..7)) {
        let players = ids(weights.len());
        let mut order = TurnOrder::new(&players, &weights).unwrap();

        for (player, &weight) in players.iter().zip(&weights) {
            for k in 0..weight {
                prop_assert_eq!(order.current_player(), *player);
                prop_assert_eq!(order.num_remaining_guesses(), (weight - k) as usize);
                order.next_turn();
            }
        }
        prop_assert_eq!(order.current_player(), players[0]);
    }

    /// `set_player` lands on the first turn of the target's block.
    #[test]
    fn prop_set_player_lands_on_block_start(
        weights in weights_strategy(),
        target in any::<prop::sample::Index>(),
    ) {
        let players = ids(weights.len());
        let target_index = target.index(players.len());
        let mut order = TurnOrder::new(&players, &weights).unwrap();

        order.set_player(players[target_index]).unwrap();

        prop_assert_eq!(order.current_player(), players[target_index]);
        prop_assert!(order.is_first_turn());
        prop_assert_eq!(order.num_remaining_guesses(), weights[target_index] as usize);
        prop_assert_eq!(order.weights(), &weights[..]);
    }
}
