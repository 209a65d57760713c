//! Combat system module
//!
//! Implements turn-based combat with:
//! - Dice rolling (e.g., "2d6+3"), weighted choice and percent checks
//! - Damage resolution with defense and blocking
//! - Potion effects and timed stat modifiers
//! - Encounter rounds, enemy turns and flee attempts

mod damage;
mod dice;
mod effects;
mod state;

pub use damage::{swing, AttackReport, Combatant, DamageReport, Fighter};
pub use dice::{
    parse_dice, percent_chance, roll_dice, roll_dice_with, weighted_choice, DiceError, DiceRoll,
};
pub use effects::{ActiveEffect, EntityEffects, PotionEffect, Stat};
pub use state::{
    attempt_flee, enemy_turn, resolve_round, CombatAction, EncounterState, RoundOutcome,
    RoundReport,
};
