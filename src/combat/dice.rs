//! Dice rolling and random selection
//!
//! Parses and rolls dice notation like "2d6+3", "d20", "4d6-2", and provides
//! the weighted and percentage checks used by encounters and loot.

use std::sync::LazyLock;

use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on dice per expression; larger pools are rejected as malformed
pub const MAX_DICE: u32 = 1000;

static DICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d*)d(\d+)([+-]\d+)?$").expect("dice pattern is valid")
});

/// Errors from dice and chance helpers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("invalid dice expression: {0}")]
    Format(String),

    #[error("percentage must be within 0-100, got {0}")]
    Range(i64),
}

/// A parsed dice roll specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

impl DiceRoll {
    /// Create a new dice roll
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self { count, sides, modifier }
    }

    /// Roll the dice with the given RNG and return the total
    pub fn roll_with<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let mut total: i64 = 0;
        for _ in 0..self.count {
            total += rng.random_range(1..=self.sides) as i64;
        }
        clamp_i32(total + self.modifier as i64)
    }

    /// Get the minimum possible result
    pub fn min(&self) -> i32 {
        clamp_i32(self.count as i64 + self.modifier as i64)
    }

    /// Get the maximum possible result
    pub fn max(&self) -> i32 {
        clamp_i32(self.count as i64 * self.sides as i64 + self.modifier as i64)
    }

    /// Get the average result
    pub fn average(&self) -> f64 {
        self.count as f64 * (self.sides as f64 + 1.0) / 2.0 + self.modifier as f64
    }
}

/// Results built with `DiceRoll::new` skip parse-time checks; saturate them
fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl FromStr for DiceRoll {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Parse a dice notation string like "2d6+3"
///
/// The count defaults to 1 ("d6" is "1d6"). Whitespace anywhere in the
/// expression is ignored and the `d` is case-insensitive.
pub fn parse_dice(notation: &str) -> Result<DiceRoll, DiceError> {
    let normalized: String = notation
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let invalid = || DiceError::Format(notation.to_string());

    let caps = DICE_PATTERN.captures(&normalized).ok_or_else(invalid)?;

    let count: u32 = match caps.get(1).map(|m| m.as_str()) {
        None | Some("") => 1,
        Some(s) => s.parse().map_err(|_| invalid())?,
    };
    let sides: u32 = caps[2].parse().map_err(|_| invalid())?;
    let modifier: i32 = match caps.get(3) {
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };

    if count == 0 || sides == 0 || count > MAX_DICE {
        return Err(invalid());
    }
    // Every possible result must fit in an i32
    if (count as u64) * (sides as u64) > i32::MAX as u64 / 2 {
        return Err(invalid());
    }
    let lowest = (count as i64) + (modifier as i64);
    let highest = (count as i64) * (sides as i64) + (modifier as i64);
    if i32::try_from(lowest).is_err() || i32::try_from(highest).is_err() {
        return Err(invalid());
    }

    Ok(DiceRoll { count, sides, modifier })
}

/// Parse and roll an expression with the thread-local RNG
pub fn roll_dice(notation: &str) -> Result<i32, DiceError> {
    roll_dice_with(notation, &mut rand::rng())
}

/// Parse and roll an expression with the given RNG
pub fn roll_dice_with<R: Rng + ?Sized>(notation: &str, rng: &mut R) -> Result<i32, DiceError> {
    Ok(parse_dice(notation)?.roll_with(rng))
}

/// Pick one outcome with probability proportional to its weight.
///
/// Falls back to a uniform pick when every weight is zero. Returns `None`
/// only for an empty slice.
pub fn weighted_choice<'a, K, R: Rng + ?Sized>(
    choices: &'a [(K, u32)],
    rng: &mut R,
) -> Option<&'a K> {
    if choices.is_empty() {
        return None;
    }

    let total: u64 = choices.iter().map(|(_, w)| *w as u64).sum();
    if total == 0 {
        return choices.choose(rng).map(|(k, _)| k);
    }

    let roll = rng.random_range(1..=total);
    let mut cumulative = 0u64;
    for (key, weight) in choices {
        cumulative += *weight as u64;
        if roll <= cumulative {
            return Some(key);
        }
    }

    None
}

/// True with probability `percent / 100`
pub fn percent_chance<R: Rng + ?Sized>(percent: i64, rng: &mut R) -> Result<bool, DiceError> {
    if !(0..=100).contains(&percent) {
        return Err(DiceError::Range(percent));
    }
    Ok(rng.random_range(0..100) < percent)
}
