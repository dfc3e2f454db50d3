//! Structured game log entries.
//!
//! Every state transition of the engine appends one `GameEvent`. The chat
//! layer renders them with `Display` (one line each); tests match on the
//! variants directly.

use serde::{Deserialize, Serialize};

use crate::core::{Player, SettingValue};

/// One line of game output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A game was created.
    Welcome,

    /// A new polynomial is being drawn.
    NewPolynomial { min_roots: u32, max_roots: u32 },

    /// A player was added to a running game.
    PlayerJoined { player: Player },

    /// Someone acted while it was not their turn.
    NotYourTurn { player: Player },

    /// Someone other than the starting player tried to set the guess count.
    NotStartingPlayer { player: Player, starting: Player },

    /// The guess count was requested after the first guess of the block.
    GuessCountOnlyOnFirstTurn,

    /// Requested guess count above the maximum.
    TooManyGuesses { max: u32 },

    /// Requested guess count below the minimum.
    TooFewGuesses { min: u32 },

    /// The starting player chose their block size.
    GuessCountSet { player: Player, num_guesses: u32, others: u32 },

    /// Guess above the domain.
    GuessTooHigh { upper: i64 },

    /// Guess below the domain.
    GuessTooLow { lower: i64 },

    /// A guess was evaluated.
    Guessed { player: Player, x: i64, value: i128 },

    /// The guess hit a root nobody had found yet.
    NewRoot,

    /// The guess hit a root that was already found.
    RootAlreadyGuessed,

    /// Roots found so far this round by one player.
    RootTally { player: Player, roots: u32 },

    /// The remaining-root threshold was reached.
    FinalRootGuessed,

    /// The leader can no longer be caught.
    OutcomeDecided,

    /// A player tied for the most roots this round.
    RoundWinner { player: Player },

    /// The roots of the finished polynomial.
    RootsRevealed { roots: Vec<i64> },

    /// Heading of the score table.
    ScoreHeader,

    /// One row of the score table.
    Score { player: Player, score: u32 },

    /// Every score was set back to zero.
    ScoreReset,

    /// Auto-play is about to guess `x` for the current player.
    ObviousRoot { x: i64 },

    /// Whose turn it is.
    CurrentTurn { player: Player, remaining: usize },

    /// One row of the guess table, padded to the given widths.
    RecapEntry {
        x: i64,
        value: i128,
        x_width: usize,
        value_width: usize,
    },

    /// A setting was changed.
    SettingChanged { name: String, value: SettingValue },

    /// A setting change was refused.
    SettingRejected { reason: String },
}

impl GameEvent {
    /// Whether this event reports a rejected action.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            GameEvent::NotYourTurn { .. }
                | GameEvent::NotStartingPlayer { .. }
                | GameEvent::GuessCountOnlyOnFirstTurn
                | GameEvent::TooManyGuesses { .. }
                | GameEvent::TooFewGuesses { .. }
                | GameEvent::GuessTooHigh { .. }
                | GameEvent::GuessTooLow { .. }
                | GameEvent::SettingRejected { .. }
        )
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::Welcome => write!(f, "Hello and welcome to this amazing game!"),
            GameEvent::NewPolynomial { min_roots, max_roots } => {
                write!(f, "Creating a new polynomial with {}-{} roots.", min_roots, max_roots)
            }
            GameEvent::PlayerJoined { player } => write!(f, "{} joined the game.", player),
            GameEvent::NotYourTurn { player } => write!(f, "It is not your turn {}", player),
            GameEvent::NotStartingPlayer { player, starting } => write!(
                f,
                "Only the starting player is allowed to set the number of guesses, {}. The current starting player is {}",
                player, starting
            ),
            GameEvent::GuessCountOnlyOnFirstTurn => {
                write!(f, "The number of guesses can only be set on the first guess.")
            }
            GameEvent::TooManyGuesses { max } => {
                write!(f, "A maximum of {} guesses is allowed!", max)
            }
            GameEvent::TooFewGuesses { min } => {
                write!(f, "A minimum of {} guesses is allowed!", min)
            }
            GameEvent::GuessCountSet {
                player,
                num_guesses,
                others,
            } => write!(
                f,
                "Set the number of guesses to {} for {} and to {} for everyone else.",
                num_guesses, player, others
            ),
            GameEvent::GuessTooHigh { upper } => write!(f, "Guess a number <= {}", upper),
            GameEvent::GuessTooLow { lower } => write!(f, "Guess a number >= {}", lower),
            GameEvent::Guessed { player, x, value } => {
                write!(f, "{} guessed f({}) = {}", player, x, group_thousands(*value))
            }
            GameEvent::NewRoot => write!(f, "That's a new root!"),
            GameEvent::RootAlreadyGuessed => {
                write!(f, "That's a root but it has already been guessed.")
            }
            GameEvent::RootTally { player, roots } => {
                write!(f, "{} guessed {} roots", player, roots)
            }
            GameEvent::FinalRootGuessed => write!(
                f,
                "That was the final root you needed to guess! Let's see who wins"
            ),
            GameEvent::OutcomeDecided => write!(f, "Damn, nobody can change the outcome anymore"),
            GameEvent::RoundWinner { player } => write!(f, "{} WINS, AWESOME!", player),
            GameEvent::RootsRevealed { roots } => write!(f, "Zeroes: {:?}", roots),
            GameEvent::ScoreHeader => write!(f, "The score is:"),
            GameEvent::Score { player, score } => write!(f, "    {}: {}", player, score),
            GameEvent::ScoreReset => write!(f, "Resetting the score to 0."),
            GameEvent::ObviousRoot { x } => write!(f, "Obvious root detected at {}!", x),
            GameEvent::CurrentTurn { player, remaining } => write!(
                f,
                "It's {}'s turn ({} guesses remaining)",
                player, remaining
            ),
            GameEvent::RecapEntry {
                x,
                value,
                x_width,
                value_width,
            } => write!(
                f,
                "`f({:<xw$}) = {:>vw$}`",
                group_thousands(i128::from(*x)),
                group_thousands(*value),
                xw = x_width,
                vw = value_width
            ),
            GameEvent::SettingChanged { name, value } => write!(f, "Set {} to {}.", name, value),
            GameEvent::SettingRejected { reason } => f.write_str(reason),
        }
    }
}

/// Render an integer with `,` between groups of three digits.
#[must_use]
pub fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
