//! Game settings.
//!
//! `GameSettings` holds every tunable of a game. The engine reads it through
//! plain fields; the chat layer reads and writes it by name through
//! `get`/`set`, which parse raw text and validate the whole configuration
//! before committing.
//!
//! ```
//! use polyguess::core::{GameSettings, SettingValue};
//!
//! let mut settings = GameSettings::default();
//! assert_eq!(settings.set("max_num_roots", "6"), Ok(SettingValue::Int(6)));
//! assert!(settings.set("max_num_roots", "2").is_err()); // below min_num_roots
//! assert_eq!(settings.max_num_roots, 6);
//! ```

use serde::{Deserialize, Serialize};

use super::SettingsError;

/// Upper limit for every turn-count setting. Block sizes are expanded into
/// the turn schedule, so they stay small.
pub const MAX_TURNS_IN_A_ROW: u32 = 100;

/// Name of a single setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    MinNumRoots,
    MaxNumRoots,
    NumRootsToGuessDownTo,
    MinNumGuessesInARow,
    MaxNumGuessesInARow,
    PunishmentForGuessingInARow,
    LowerBound,
    UpperBound,
    AutoRecap,
    AutoPlay,
}

impl SettingKey {
    /// Every key, in display order.
    pub const ALL: [SettingKey; 10] = [
        SettingKey::MinNumRoots,
        SettingKey::MaxNumRoots,
        SettingKey::NumRootsToGuessDownTo,
        SettingKey::MinNumGuessesInARow,
        SettingKey::MaxNumGuessesInARow,
        SettingKey::PunishmentForGuessingInARow,
        SettingKey::LowerBound,
        SettingKey::UpperBound,
        SettingKey::AutoRecap,
        SettingKey::AutoPlay,
    ];

    /// The name users type to address this setting.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SettingKey::MinNumRoots => "min_num_roots",
            SettingKey::MaxNumRoots => "max_num_roots",
            SettingKey::NumRootsToGuessDownTo => "num_roots_to_guess_down_to",
            SettingKey::MinNumGuessesInARow => "min_num_guesses_in_a_row",
            SettingKey::MaxNumGuessesInARow => "max_num_guesses_in_a_row",
            SettingKey::PunishmentForGuessingInARow => "punishment_for_guessing_in_a_row",
            SettingKey::LowerBound => "lower_bound",
            SettingKey::UpperBound => "upper_bound",
            SettingKey::AutoRecap => "auto_recap",
            SettingKey::AutoPlay => "auto_play",
        }
    }

    /// One-line description shown by the help command.
    #[must_use]
    pub const fn help(self) -> &'static str {
        match self {
            SettingKey::MinNumRoots => {
                "The minimum number of roots that a new polynomial will be created with."
            }
            SettingKey::MaxNumRoots => {
                "The maximum number of roots that a new polynomial will be created with."
            }
            SettingKey::NumRootsToGuessDownTo => {
                "The number of remaining roots at which the round is scored."
            }
            SettingKey::MinNumGuessesInARow => {
                "The minimum (and default) number of guesses a player has in a row."
            }
            SettingKey::MaxNumGuessesInARow => {
                "The maximum number of guesses the starting player can give themselves (by typing #N)."
            }
            SettingKey::PunishmentForGuessingInARow => {
                "How many more guesses everyone else gets when the starting player raises their number of guesses."
            }
            SettingKey::LowerBound => "The smallest number that can be guessed.",
            SettingKey::UpperBound => "The largest number that can be guessed.",
            SettingKey::AutoRecap => "Whether to show a recap of all guesses after each guess.",
            SettingKey::AutoPlay => {
                "Whether to fill in obvious roots (a single hole between two guesses with a sign change) automatically."
            }
        }
    }

    /// Whether this setting holds a boolean toggle.
    #[must_use]
    pub const fn is_toggle(self) -> bool {
        matches!(self, SettingKey::AutoRecap | SettingKey::AutoPlay)
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SettingKey::ALL
            .into_iter()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| SettingsError::UnknownSetting(wanted.to_string()))
    }
}

/// Value of a single setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValue {
    Int(i64),
    Bool(bool),
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Complete game configuration.
///
/// Values persist across rounds until explicitly changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Minimum root count of a new polynomial.
    pub min_num_roots: u32,

    /// Maximum root count of a new polynomial.
    pub max_num_roots: u32,

    /// The round is scored once this many distinct roots remain.
    pub num_roots_to_guess_down_to: u32,

    /// Default number of consecutive turns per player.
    pub min_num_guesses_in_a_row: u32,

    /// Largest block the starting player may choose.
    pub max_num_guesses_in_a_row: u32,

    /// Extra turns for the other players when the starting player chooses a block.
    pub punishment_for_guessing_in_a_row: u32,

    /// Lowest legal guess (and root).
    pub lower_bound: i64,

    /// Highest legal guess (and root).
    pub upper_bound: i64,

    /// Show the full guess table after every wasted guess.
    pub auto_recap: bool,

    /// Resolve obvious roots automatically.
    pub auto_play: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            min_num_roots: 4,
            max_num_roots: 9,
            num_roots_to_guess_down_to: 3,
            min_num_guesses_in_a_row: 1,
            max_num_guesses_in_a_row: 4,
            punishment_for_guessing_in_a_row: 2,
            lower_bound: 0,
            upper_bound: 100,
            auto_recap: true,
            auto_play: true,
        }
    }
}

impl GameSettings {
    /// Set the range of root counts for new polynomials.
    #[must_use]
    pub fn with_num_roots(mut self, min: u32, max: u32) -> Self {
        self.min_num_roots = min;
        self.max_num_roots = max;
        self
    }

    /// Set the remaining-root count at which rounds are scored.
    #[must_use]
    pub fn with_num_roots_to_guess_down_to(mut self, down_to: u32) -> Self {
        self.num_roots_to_guess_down_to = down_to;
        self
    }

    /// Set the range of guesses in a row.
    #[must_use]
    pub fn with_guesses_in_a_row(mut self, min: u32, max: u32) -> Self {
        self.min_num_guesses_in_a_row = min;
        self.max_num_guesses_in_a_row = max;
        self
    }

    /// Set the punishment for guessing in a row.
    #[must_use]
    pub fn with_punishment(mut self, punishment: u32) -> Self {
        self.punishment_for_guessing_in_a_row = punishment;
        self
    }

    /// Set the guessing domain.
    #[must_use]
    pub fn with_bounds(mut self, lower: i64, upper: i64) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Toggle automatic recaps.
    #[must_use]
    pub fn with_auto_recap(mut self, enabled: bool) -> Self {
        self.auto_recap = enabled;
        self
    }

    /// Toggle automatic resolution of obvious roots.
    #[must_use]
    pub fn with_auto_play(mut self, enabled: bool) -> Self {
        self.auto_play = enabled;
        self
    }

    /// Read a setting by key.
    #[must_use]
    pub fn value(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::MinNumRoots => SettingValue::Int(self.min_num_roots.into()),
            SettingKey::MaxNumRoots => SettingValue::Int(self.max_num_roots.into()),
            SettingKey::NumRootsToGuessDownTo => {
                SettingValue::Int(self.num_roots_to_guess_down_to.into())
            }
            SettingKey::MinNumGuessesInARow => {
                SettingValue::Int(self.min_num_guesses_in_a_row.into())
            }
            SettingKey::MaxNumGuessesInARow => {
                SettingValue::Int(self.max_num_guesses_in_a_row.into())
            }
            SettingKey::PunishmentForGuessingInARow => {
                SettingValue::Int(self.punishment_for_guessing_in_a_row.into())
            }
            SettingKey::LowerBound => SettingValue::Int(self.lower_bound),
            SettingKey::UpperBound => SettingValue::Int(self.upper_bound),
            SettingKey::AutoRecap => SettingValue::Bool(self.auto_recap),
            SettingKey::AutoPlay => SettingValue::Bool(self.auto_play),
        }
    }

    /// Read a setting by name.
    pub fn get(&self, name: &str) -> Result<SettingValue, SettingsError> {
        Ok(self.value(name.parse()?))
    }

    /// Parse `raw` and assign it to the named setting.
    ///
    /// The change is only committed when the resulting configuration passes
    /// `validate`; otherwise `self` is left untouched.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<SettingValue, SettingsError> {
        let key: SettingKey = name.parse()?;
        let value = parse_value(key, raw)?;

        let mut candidate = self.clone();
        candidate.assign(key, value)?;
        candidate.validate()?;

        *self = candidate;
        Ok(value)
    }

    /// Ordered `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, SettingValue)> + '_ {
        SettingKey::ALL.into_iter().map(move |key| (key, self.value(key)))
    }

    /// `key = value` lines for every setting.
    #[must_use]
    pub fn dump(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{} = {}", key, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `key: help` lines for every setting.
    #[must_use]
    pub fn help() -> String {
        SettingKey::ALL
            .into_iter()
            .map(|key| format!("{}: {}", key, key.help()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_num_roots == 0 {
            return Err(out_of_bounds(SettingKey::MinNumRoots, "must be at least 1"));
        }
        if self.min_num_roots > self.max_num_roots {
            return Err(out_of_bounds(
                SettingKey::MaxNumRoots,
                "must not be smaller than min_num_roots",
            ));
        }
        if self.min_num_guesses_in_a_row == 0 {
            return Err(out_of_bounds(
                SettingKey::MinNumGuessesInARow,
                "must be at least 1",
            ));
        }
        if self.max_num_guesses_in_a_row < self.min_num_guesses_in_a_row {
            return Err(out_of_bounds(
                SettingKey::MaxNumGuessesInARow,
                "must not be smaller than min_num_guesses_in_a_row",
            ));
        }
        for (key, turns) in [
            (SettingKey::MinNumGuessesInARow, self.min_num_guesses_in_a_row),
            (SettingKey::MaxNumGuessesInARow, self.max_num_guesses_in_a_row),
            (
                SettingKey::PunishmentForGuessingInARow,
                self.punishment_for_guessing_in_a_row,
            ),
        ] {
            if turns > MAX_TURNS_IN_A_ROW {
                let reason = format!("must be at most {}", MAX_TURNS_IN_A_ROW);
                return Err(out_of_bounds(key, &reason));
            }
        }
        if self.lower_bound >= self.upper_bound {
            return Err(out_of_bounds(
                SettingKey::UpperBound,
                "must be larger than lower_bound",
            ));
        }
        // |x - root| <= upper - lower for every legal x, so this bounds |f(x)|.
        let width = i128::from(self.upper_bound) - i128::from(self.lower_bound);
        if width.checked_pow(self.max_num_roots).is_none() {
            return Err(out_of_bounds(
                SettingKey::MaxNumRoots,
                "polynomial values would not fit in 128 bits for this range",
            ));
        }
        Ok(())
    }

    fn assign(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        let count = |v: i64| {
            u32::try_from(v).map_err(|_| out_of_bounds(key, "must be between 0 and 4294967295"))
        };
        match (key, value) {
            (SettingKey::MinNumRoots, SettingValue::Int(v)) => self.min_num_roots = count(v)?,
            (SettingKey::MaxNumRoots, SettingValue::Int(v)) => self.max_num_roots = count(v)?,
            (SettingKey::NumRootsToGuessDownTo, SettingValue::Int(v)) => {
                self.num_roots_to_guess_down_to = count(v)?
            }
            (SettingKey::MinNumGuessesInARow, SettingValue::Int(v)) => {
                self.min_num_guesses_in_a_row = count(v)?
            }
            (SettingKey::MaxNumGuessesInARow, SettingValue::Int(v)) => {
                self.max_num_guesses_in_a_row = count(v)?
            }
            (SettingKey::PunishmentForGuessingInARow, SettingValue::Int(v)) => {
                self.punishment_for_guessing_in_a_row = count(v)?
            }
            (SettingKey::LowerBound, SettingValue::Int(v)) => self.lower_bound = v,
            (SettingKey::UpperBound, SettingValue::Int(v)) => self.upper_bound = v,
            (SettingKey::AutoRecap, SettingValue::Bool(v)) => self.auto_recap = v,
            (SettingKey::AutoPlay, SettingValue::Bool(v)) => self.auto_play = v,
            (key, value) => {
                return Err(SettingsError::InvalidValue {
                    name: key.name().to_string(),
                    value: value.to_string(),
                })
            }
        }
        Ok(())
    }
}

fn out_of_bounds(key: SettingKey, reason: &str) -> SettingsError {
    SettingsError::OutOfBounds {
        name: key.name().to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value(key: SettingKey, raw: &str) -> Result<SettingValue, SettingsError> {
    let raw = raw.trim();
    let invalid = || SettingsError::InvalidValue {
        name: key.name().to_string(),
        value: raw.to_string(),
    };

    if key.is_toggle() {
        let value = match raw.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => true,
            "false" | "off" | "no" => false,
            other => other.parse::<i64>().map_err(|_| invalid())? != 0,
        };
        Ok(SettingValue::Bool(value))
    } else {
        raw.parse::<i64>().map(SettingValue::Int).map_err(|_| invalid())
    }
}
