//! Leveling curve
//!
//! XP needed to leave a level is `floor(BASE_XP * level^EXPONENT * FACTOR)`.

use rand::Rng;

pub const BASE_XP: f64 = 100.0;
pub const FACTOR: f64 = 1.2;
pub const EXPONENT: f64 = 1.5;

/// Max HP gained per level
pub const HP_PER_LEVEL: i32 = 10;

/// XP required to advance from `level` to the next one
pub fn xp_threshold(level: i64) -> u32 {
    if level <= 0 {
        return 0;
    }
    (BASE_XP * (level as f64).powf(EXPONENT) * FACTOR).floor() as u32
}

/// Stat increases granted by one level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGains {
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
}

impl LevelGains {
    /// Roll the gains for one level: +10 HP, +1..=2 attack, +0..=1 defense
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            max_hp: HP_PER_LEVEL,
            attack: rng.random_range(1..=2),
            defense: rng.random_range(0..=1),
        }
    }
}
