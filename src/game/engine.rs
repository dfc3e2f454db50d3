//! The round engine.
//!
//! `Game` owns one game instance: the hidden polynomial, the guessing turn
//! order, the rotation of starting players, per-player counters and the
//! event log. Every public action is a single synchronous transition.
//!
//! ## Round flow
//!
//! 1. The starting player may choose a block size on their first turn
//!    (`submit_guess_count_choice`). Everyone else gets the punishment on top.
//! 2. Players guess in turn (`submit_guess`). A miss consumes a turn; a hit on
//!    a new root scores and the same player keeps guessing.
//! 3. When a full cycle returns to the starting player, block sizes revert to
//!    the default.
//! 4. With auto-play on, a root trapped between two guesses two apart with a
//!    sign change is guessed for the current player.
//! 5. The round ends when few enough roots remain or the leader can no longer
//!    be caught. Everyone tied for most roots gets a point, the starting
//!    player rotates and a new polynomial is drawn.
//!
//! Player mistakes are reported as events and change nothing. Only caller
//! bugs surface as `GameError`.

use im::OrdSet;
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::core::{GameError, GameRng, GameSettings, Player, PlayerId, PlayerState, TurnOrderError};
use crate::polynomial::RootFunction;
use crate::turns::TurnOrder;

use super::event::group_thousands;
use super::snapshot::GameSnapshot;
use super::{GameEvent, GameLog};

/// What a single evaluated guess did to the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GuessOutcome {
    /// Not a root; the turn is consumed.
    Miss,
    /// Found a root; the round goes on with the same player.
    NewRoot,
    /// Hit a root somebody already found.
    AlreadyFound,
    /// Found a root and the round was resolved.
    RoundOver,
}

/// One game instance.
#[derive(Clone, Debug)]
pub struct Game {
    settings: GameSettings,

    /// Seating order. Never empty.
    players: Vec<Player>,

    /// Counters per player.
    states: FxHashMap<PlayerId, PlayerState>,

    function: RootFunction,

    /// Distinct roots nobody has found yet this round.
    roots_to_guess: OrdSet<i64>,

    /// Every value guessed this round.
    guessed_values: OrdSet<i64>,

    /// Round ends once `roots_to_guess` shrinks to this size.
    num_roots_to_guess_down_to: u32,

    /// Guessing order for the current round.
    turn_order: TurnOrder,

    /// Unit-weight order whose current player starts the round.
    starting_player_order: TurnOrder,

    rng: GameRng,

    log: GameLog,
}

impl Game {
    /// Create a game seeded from system entropy.
    pub fn new(players: Vec<Player>, settings: GameSettings) -> Result<Self, GameError> {
        Self::with_rng(players, settings, GameRng::from_entropy())
    }

    /// Create a game drawing polynomials from `rng`.
    ///
    /// The first player in `players` starts the first round.
    pub fn with_rng(
        players: Vec<Player>,
        settings: GameSettings,
        mut rng: GameRng,
    ) -> Result<Self, GameError> {
        settings.validate()?;
        let ids = unique_ids(&players)?;

        let starting_player_order = TurnOrder::uniform(&ids, 1)?;
        let turn_order = TurnOrder::uniform(&ids, settings.min_num_guesses_in_a_row)?;
        let states = ids.iter().map(|&id| (id, PlayerState::default())).collect();
        let function = draw_function(&settings, &mut rng);

        let mut game = Self {
            num_roots_to_guess_down_to: settings.num_roots_to_guess_down_to,
            settings,
            players,
            states,
            roots_to_guess: OrdSet::new(),
            guessed_values: OrdSet::new(),
            function: function.clone(),
            turn_order,
            starting_player_order,
            rng,
            log: GameLog::new(),
        };

        game.log.push(GameEvent::Welcome);
        game.log.push(GameEvent::NewPolynomial {
            min_roots: game.settings.min_num_roots,
            max_roots: game.settings.max_num_roots,
        });
        game.begin_round(function);
        game.reset_turn_order()?;
        game.show_current_player();
        Ok(game)
    }

    // === Player actions ===

    /// `player` guesses `x`.
    pub fn submit_guess(&mut self, player: PlayerId, x: i64) -> Result<(), GameError> {
        if !self.turn_order.is_players_turn(player) {
            let player = self.player(player);
            self.log.push(GameEvent::NotYourTurn { player });
            return Ok(());
        }
        if !self.function.in_domain(x) {
            let event = if x > self.function.upper_bound() {
                GameEvent::GuessTooHigh {
                    upper: self.function.upper_bound(),
                }
            } else {
                GameEvent::GuessTooLow {
                    lower: self.function.lower_bound(),
                }
            };
            self.log.push(event);
            return Ok(());
        }

        // Obvious roots are only looked for after a miss or an auto-played
        // find; a manual find just keeps the turn.
        let mut guess = x;
        let mut auto_played = false;
        loop {
            match self.apply_guess(guess)? {
                GuessOutcome::RoundOver => return Ok(()),
                GuessOutcome::AlreadyFound => {
                    self.show_current_player();
                    return Ok(());
                }
                GuessOutcome::Miss => self.next_turn()?,
                GuessOutcome::NewRoot if !auto_played => {
                    self.show_recap_or_current_player();
                    return Ok(());
                }
                GuessOutcome::NewRoot => {}
            }

            match self.first_obvious_root() {
                Some(root) if self.settings.auto_play => {
                    debug!(
                        "auto-playing obvious root {} for {}",
                        root,
                        self.turn_order.current_player()
                    );
                    self.log.push(GameEvent::ObviousRoot { x: root });
                    guess = root;
                    auto_played = true;
                }
                _ => {
                    self.show_recap_or_current_player();
                    return Ok(());
                }
            }
        }
    }

    /// The starting player asks for `num_guesses` turns in a row this cycle.
    pub fn submit_guess_count_choice(
        &mut self,
        player: PlayerId,
        num_guesses: i64,
    ) -> Result<(), GameError> {
        let max = self.settings.max_num_guesses_in_a_row;
        let min = self.settings.min_num_guesses_in_a_row.saturating_add(1);

        if !self.turn_order.is_players_turn(player) {
            let player = self.player(player);
            self.log.push(GameEvent::NotYourTurn { player });
        } else if self.starting_player() != player {
            let player = self.player(player);
            let starting = self.player(self.starting_player());
            self.log.push(GameEvent::NotStartingPlayer { player, starting });
        } else if !self.turn_order.is_first_turn() {
            self.log.push(GameEvent::GuessCountOnlyOnFirstTurn);
        } else if num_guesses > i64::from(max) {
            self.log.push(GameEvent::TooManyGuesses { max });
        } else if num_guesses < i64::from(min) {
            self.log.push(GameEvent::TooFewGuesses { min });
        } else {
            let num_guesses = num_guesses as u32;
            let others = num_guesses.saturating_add(self.settings.punishment_for_guessing_in_a_row);
            let weights: Vec<u32> = self
                .players
                .iter()
                .map(|p| if p.id == player { num_guesses } else { others })
                .collect();
            self.rebuild_turn_order(&weights)?;

            let player = self.player(player);
            self.log.push(GameEvent::GuessCountSet {
                player,
                num_guesses,
                others,
            });
            self.show_current_player();
        }
        Ok(())
    }

    // === Commands ===

    /// Log the table of guessed values followed by whose turn it is.
    pub fn recap(&mut self) {
        if !self.guessed_values.is_empty() {
            let rows: Vec<(i64, i128)> = self
                .guessed_values
                .iter()
                .map(|&x| (x, self.function.evaluate(x)))
                .collect();
            let x_width = rows
                .iter()
                .map(|&(x, _)| group_thousands(i128::from(x)).len())
                .max()
                .unwrap_or(0);
            let value_width = rows
                .iter()
                .map(|&(_, value)| group_thousands(value).len())
                .max()
                .unwrap_or(0);

            for (x, value) in rows {
                self.log.push(GameEvent::RecapEntry {
                    x,
                    value,
                    x_width,
                    value_width,
                });
            }
        }
        self.show_current_player();
    }

    /// Log how many roots each player found this round.
    pub fn player_recap(&mut self) {
        for player in &self.players {
            let roots = self.state(player.id).num_guessed_roots;
            self.log.push(GameEvent::RootTally {
                player: player.clone(),
                roots,
            });
        }
    }

    /// Log the score table.
    pub fn show_score(&mut self) {
        self.log.push(GameEvent::ScoreHeader);
        for player in &self.players {
            let score = self.state(player.id).score;
            self.log.push(GameEvent::Score {
                player: player.clone(),
                score,
            });
        }
    }

    /// Set every score back to zero.
    pub fn reset_score(&mut self) {
        self.log.push(GameEvent::ScoreReset);
        for state in self.states.values_mut() {
            state.score = 0;
        }
    }

    /// Abandon the current polynomial and draw a new one.
    ///
    /// The starting player does not rotate.
    pub fn new_polynomial(&mut self) -> Result<(), GameError> {
        self.reset_function();
        self.reset_turn_order()?;
        self.show_current_player();
        Ok(())
    }

    /// Begin a round with a known polynomial.
    pub fn start_round_with(&mut self, function: RootFunction) -> Result<(), GameError> {
        self.begin_round(function);
        self.reset_turn_order()?;
        self.show_current_player();
        Ok(())
    }

    /// Change a setting by name and log the result.
    pub fn change_setting(&mut self, name: &str, raw: &str) {
        match self.settings.set(name, raw) {
            Ok(value) => {
                info!("setting {} changed to {}", name.trim(), value);
                self.log.push(GameEvent::SettingChanged {
                    name: name.trim().to_string(),
                    value,
                });
            }
            Err(err) => self.log.push(GameEvent::SettingRejected {
                reason: err.to_string(),
            }),
        }
    }

    /// Register a newcomer and start a fresh round. Scores are kept.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.states.contains_key(&player.id) {
            return Err(GameError::DuplicatePlayer(player.id));
        }
        info!("registering player {} ({})", player.name, player.id);

        let starting = self.starting_player();
        self.states.insert(player.id, PlayerState::default());
        self.players.push(player.clone());

        let ids = self.player_ids();
        self.starting_player_order = TurnOrder::uniform(&ids, 1)?;
        self.starting_player_order.set_player(starting)?;

        self.log.push(GameEvent::PlayerJoined { player });
        self.new_polynomial()
    }

    // === Queries ===

    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turn_order.current_player()
    }

    /// Turns the current player has left in their block, this one included.
    #[must_use]
    pub fn remaining_guesses(&self) -> usize {
        self.turn_order.num_remaining_guesses()
    }

    /// Player who started (and may set the guess count of) this round.
    #[must_use]
    pub fn starting_player(&self) -> PlayerId {
        self.starting_player_order.current_player()
    }

    /// Roots found this round, in seating order.
    #[must_use]
    pub fn root_tally(&self) -> Vec<(PlayerId, u32)> {
        self.players
            .iter()
            .map(|p| (p.id, self.state(p.id).num_guessed_roots))
            .collect()
    }

    /// Persistent scores, in seating order.
    #[must_use]
    pub fn scores(&self) -> Vec<(PlayerId, u32)> {
        self.players
            .iter()
            .map(|p| (p.id, self.state(p.id).score))
            .collect()
    }

    /// Counters of one player.
    #[must_use]
    pub fn player_state(&self, player: PlayerId) -> Option<&PlayerState> {
        self.states.get(&player)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// `key = value` lines for every setting.
    #[must_use]
    pub fn dump_settings(&self) -> String {
        self.settings.dump()
    }

    /// `key: help` lines for every setting.
    #[must_use]
    pub fn settings_help(&self) -> String {
        GameSettings::help()
    }

    /// The hidden polynomial of this round.
    #[must_use]
    pub fn function(&self) -> &RootFunction {
        &self.function
    }

    /// Distinct roots not found yet.
    #[must_use]
    pub fn roots_to_guess(&self) -> &OrdSet<i64> {
        &self.roots_to_guess
    }

    /// Every value guessed this round.
    #[must_use]
    pub fn guessed_values(&self) -> &OrdSet<i64> {
        &self.guessed_values
    }

    #[must_use]
    pub fn turn_order(&self) -> &TurnOrder {
        &self.turn_order
    }

    // === Log ===

    /// Pending events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        self.log.events()
    }

    /// Take every pending event.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.log.drain_events()
    }

    /// Take every pending event as text, one line each.
    pub fn drain_log(&mut self) -> String {
        self.log.drain()
    }

    // === Snapshots ===

    /// Capture everything but the log.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            settings: self.settings.clone(),
            players: self.players.clone(),
            states: self.states.clone(),
            function: self.function.clone(),
            roots_to_guess: self.roots_to_guess.clone(),
            guessed_values: self.guessed_values.clone(),
            num_roots_to_guess_down_to: self.num_roots_to_guess_down_to,
            turn_order: self.turn_order.clone(),
            starting_player_order: self.starting_player_order.clone(),
            rng: self.rng.state(),
        }
    }

    /// Rebuild a game from a snapshot, with an empty log.
    pub fn restore(snapshot: GameSnapshot) -> Result<Self, GameError> {
        snapshot.settings.validate()?;
        let ids = unique_ids(&snapshot.players)?;
        snapshot.turn_order.validate()?;
        snapshot.starting_player_order.validate()?;
        for &id in &ids {
            if !snapshot.turn_order.contains(id) || !snapshot.starting_player_order.contains(id) {
                return Err(TurnOrderError::NotAMember(id).into());
            }
        }

        let mut states = snapshot.states;
        for &id in &ids {
            states.entry(id).or_default();
        }

        Ok(Self {
            settings: snapshot.settings,
            players: snapshot.players,
            states,
            function: snapshot.function,
            roots_to_guess: snapshot.roots_to_guess,
            guessed_values: snapshot.guessed_values,
            num_roots_to_guess_down_to: snapshot.num_roots_to_guess_down_to,
            turn_order: snapshot.turn_order,
            starting_player_order: snapshot.starting_player_order,
            rng: GameRng::from_state(&snapshot.rng),
            log: GameLog::new(),
        })
    }

    // === Internals ===

    /// Log, record and score one in-range guess by the current player.
    fn apply_guess(&mut self, x: i64) -> Result<GuessOutcome, GameError> {
        let current = self.turn_order.current_player();
        let player = self.player(current);
        let value = self.function.evaluate(x);
        self.log.push(GameEvent::Guessed { player, x, value });
        self.guessed_values.insert(x);

        if value != 0 {
            return Ok(GuessOutcome::Miss);
        }
        if self.roots_to_guess.remove(&x).is_none() {
            self.log.push(GameEvent::RootAlreadyGuessed);
            return Ok(GuessOutcome::AlreadyFound);
        }

        self.log.push(GameEvent::NewRoot);
        self.states.entry(current).or_default().num_guessed_roots += 1;
        self.player_recap();

        let threshold_reached =
            self.roots_to_guess.len() <= self.num_roots_to_guess_down_to as usize;
        if threshold_reached {
            self.log.push(GameEvent::FinalRootGuessed);
        } else if self.outcome_decided() {
            self.log.push(GameEvent::OutcomeDecided);
        } else {
            return Ok(GuessOutcome::NewRoot);
        }

        self.resolve_round()?;
        Ok(GuessOutcome::RoundOver)
    }

    /// Whether the leader's margin exceeds the roots still up for grabs.
    fn outcome_decided(&self) -> bool {
        if self.players.len() < 2 {
            return false;
        }
        let mut tallies: Vec<u32> = self
            .players
            .iter()
            .map(|p| self.state(p.id).num_guessed_roots)
            .collect();
        tallies.sort_unstable_by(|a, b| b.cmp(a));

        let (top, second) = (tallies[0], tallies[1]);
        if top == second {
            return false;
        }
        let discoverable = self
            .roots_to_guess
            .len()
            .saturating_sub(self.num_roots_to_guess_down_to as usize);
        (top - second) as usize > discoverable
    }

    /// Award the round, rotate the starting player and draw a new polynomial.
    fn resolve_round(&mut self) -> Result<(), GameError> {
        let best = self
            .players
            .iter()
            .map(|p| self.state(p.id).num_guessed_roots)
            .max()
            .unwrap_or(0);

        let winners: Vec<Player> = self
            .players
            .iter()
            .filter(|p| self.state(p.id).num_guessed_roots == best)
            .cloned()
            .collect();
        for winner in winners {
            self.states.entry(winner.id).or_default().score += 1;
            info!("{} wins the round with {} roots", winner.name, best);
            self.log.push(GameEvent::RoundWinner { player: winner });
        }

        self.log.push(GameEvent::RootsRevealed {
            roots: self.function.roots().to_vec(),
        });
        self.show_score();

        self.starting_player_order.next_turn();
        self.reset_function();
        self.reset_turn_order()?;
        self.show_current_player();
        Ok(())
    }

    /// Consume a turn; revert block sizes once the cycle is back at the start.
    fn next_turn(&mut self) -> Result<(), GameError> {
        self.turn_order.next_turn();
        if self.turn_order.current_player() == self.starting_player()
            && self.turn_order.is_first_turn()
        {
            self.reset_turn_order()?;
        }
        Ok(())
    }

    /// Default block sizes, anchored at the starting player.
    fn reset_turn_order(&mut self) -> Result<(), GameError> {
        let weights = vec![self.settings.min_num_guesses_in_a_row; self.players.len()];
        self.rebuild_turn_order(&weights)
    }

    fn rebuild_turn_order(&mut self, weights: &[u32]) -> Result<(), GameError> {
        let mut order = TurnOrder::new(&self.player_ids(), weights)?;
        order.set_player(self.starting_player())?;
        debug!("turn order rebuilt with weights {:?}", weights);
        self.turn_order = order;
        Ok(())
    }

    /// Draw a new polynomial from the current settings.
    fn reset_function(&mut self) {
        self.log.push(GameEvent::NewPolynomial {
            min_roots: self.settings.min_num_roots,
            max_roots: self.settings.max_num_roots,
        });
        let function = draw_function(&self.settings, &mut self.rng);
        self.begin_round(function);
    }

    /// Install `function` and clear all round-scoped state.
    fn begin_round(&mut self, function: RootFunction) {
        debug!("new round with {} roots", function.roots().len());
        self.roots_to_guess = function.roots().iter().copied().collect();
        self.guessed_values = OrdSet::new();
        self.num_roots_to_guess_down_to = self.settings.num_roots_to_guess_down_to;
        self.function = function;
        for state in self.states.values_mut() {
            state.reset_round();
        }
    }

    /// Midpoint of the first pair of guesses two apart whose values have
    /// opposite signs.
    fn first_obvious_root(&self) -> Option<i64> {
        let guessed: Vec<i64> = self.guessed_values.iter().copied().collect();
        guessed.windows(2).find_map(|pair| {
            let (x1, x2) = (pair[0], pair[1]);
            let sign1 = self.function.evaluate(x1).signum();
            let sign2 = self.function.evaluate(x2).signum();
            let gap = i128::from(x2) - i128::from(x1);
            (gap == 2 && sign1 * sign2 < 0).then_some(x1 + 1)
        })
    }

    fn show_recap_or_current_player(&mut self) {
        if self.settings.auto_recap {
            self.recap();
        } else {
            self.show_current_player();
        }
    }

    fn show_current_player(&mut self) {
        let player = self.player(self.turn_order.current_player());
        let remaining = self.turn_order.num_remaining_guesses();
        self.log.push(GameEvent::CurrentTurn { player, remaining });
    }

    fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Display handle for `id`; unknown ids get a placeholder name.
    fn player(&self, id: PlayerId) -> Player {
        self.players
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .unwrap_or_else(|| Player {
                id,
                name: id.to_string(),
            })
    }

    fn state(&self, id: PlayerId) -> PlayerState {
        self.states.get(&id).copied().unwrap_or_default()
    }
}

fn unique_ids(players: &[Player]) -> Result<Vec<PlayerId>, GameError> {
    if players.is_empty() {
        return Err(GameError::NoPlayers);
    }
    let mut ids: Vec<PlayerId> = Vec::with_capacity(players.len());
    for player in players {
        if ids.contains(&player.id) {
            return Err(GameError::DuplicatePlayer(player.id));
        }
        ids.push(player.id);
    }
    Ok(ids)
}

fn draw_function(settings: &GameSettings, rng: &mut GameRng) -> RootFunction {
    let num_roots = rng.gen_range_u32(settings.min_num_roots..=settings.max_num_roots);
    RootFunction::create(num_roots, settings.lower_bound, settings.upper_bound, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_player_game(settings: GameSettings) -> Game {
        let players = vec![Player::new(1, "alice"), Player::new(2, "bob")];
        Game::with_rng(players, settings, GameRng::new(42)).unwrap()
    }

    #[test]
    fn test_new_game_logs_welcome() {
        let mut game = two_player_game(GameSettings::default());
        let events = game.drain_events();

        assert_eq!(events[0], GameEvent::Welcome);
        assert!(matches!(events[1], GameEvent::NewPolynomial { min_roots: 4, max_roots: 9 }));
        assert!(matches!(events.last(), Some(GameEvent::CurrentTurn { remaining: 1, .. })));
        assert_eq!(game.current_player(), PlayerId::new(1));
        assert_eq!(game.starting_player(), PlayerId::new(1));
    }

    #[test]
    fn test_new_game_rejects_bad_input() {
        assert!(matches!(
            Game::with_rng(vec![], GameSettings::default(), GameRng::new(1)),
            Err(GameError::NoPlayers)
        ));

        let dup = vec![Player::new(1, "a"), Player::new(1, "b")];
        assert!(matches!(
            Game::with_rng(dup, GameSettings::default(), GameRng::new(1)),
            Err(GameError::DuplicatePlayer(_))
        ));

        let bad = GameSettings::default().with_num_roots(5, 2);
        assert!(matches!(
            Game::with_rng(vec![Player::new(1, "a")], bad, GameRng::new(1)),
            Err(GameError::Settings(_))
        ));
    }

    #[test]
    fn test_round_state_matches_function() {
        let game = two_player_game(GameSettings::default());
        let distinct: OrdSet<i64> = game.function().roots().iter().copied().collect();

        assert_eq!(game.roots_to_guess(), &distinct);
        assert!(game.guessed_values().is_empty());
        assert!((4..=9).contains(&game.function().roots().len()));
    }

    #[test]
    fn test_obvious_root_requires_gap_of_two() {
        let mut game = two_player_game(GameSettings::default());
        game.start_round_with(RootFunction::from_roots([10], 0, 100)).unwrap();

        game.guessed_values.insert(8);
        game.guessed_values.insert(11);
        assert_eq!(game.first_obvious_root(), None);

        game.guessed_values.insert(9);
        assert_eq!(game.first_obvious_root(), Some(10));
    }

    #[test]
    fn test_double_root_is_not_obvious() {
        let mut game = two_player_game(GameSettings::default());
        game.start_round_with(RootFunction::from_roots([10, 10], 0, 100)).unwrap();

        game.guessed_values.insert(9);
        game.guessed_values.insert(11);
        assert_eq!(game.first_obvious_root(), None);
        assert_eq!(game.roots_to_guess().len(), 1);
    }

    #[test]
    fn test_outcome_decided_single_player() {
        let players = vec![Player::new(1, "solo")];
        let mut game = Game::with_rng(players, GameSettings::default(), GameRng::new(3)).unwrap();
        game.states.entry(PlayerId::new(1)).or_default().num_guessed_roots = 5;
        assert!(!game.outcome_decided());
    }
}
