//! Encounter state and round resolution
//!
//! One round is the player's action followed, when both sides are still
//! standing, by the enemy's automatic turn.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::damage::Fighter;
use super::dice::percent_chance;
use crate::enemy::Enemy;
use crate::player::{InventoryError, Player};

/// Enemy considers blocking below this share of max HP
pub const ENEMY_BLOCK_HP_PERCENT: i32 = 30;

/// Chance a wounded enemy blocks instead of attacking
pub const ENEMY_BLOCK_CHANCE: i64 = 30;

/// Chance a flee attempt succeeds
pub const FLEE_CHANCE: i64 = 50;

/// Whether an encounter is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncounterState {
    #[default]
    Idle,
    InCombat,
}

/// Player choices during combat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatAction {
    Attack,
    Block,
    UsePotion(String),
    Flee,
}

/// How a round left the encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Both sides still standing
    Continue,
    /// Enemy reduced to 0 HP
    Victory,
    /// Player reduced to 0 HP
    Defeat,
    /// Player escaped
    Fled,
}

/// Messages and outcome of one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub messages: Vec<String>,
    pub outcome: RoundOutcome,
}

/// Whether a wounded enemy should brace instead of attacking
fn enemy_wants_to_block(enemy: &Enemy, rng: &mut dyn RngCore) -> bool {
    let c = enemy.combatant();
    let wounded = c.hp * 100 < c.max_hp * ENEMY_BLOCK_HP_PERCENT;
    wounded && percent_chance(ENEMY_BLOCK_CHANCE, rng).unwrap_or(false)
}

/// The enemy's automatic turn
pub fn enemy_turn(enemy: &mut Enemy, player: &mut Player, rng: &mut dyn RngCore) -> String {
    if !enemy.is_alive() || !player.is_alive() {
        return String::new();
    }

    if enemy_wants_to_block(enemy, rng) {
        debug!("{} blocks", enemy.name());
        enemy.block()
    } else {
        debug!("{} attacks {}", enemy.name(), player.name());
        enemy.attack(player, rng).message
    }
}

/// Roll a flee attempt
pub fn attempt_flee(rng: &mut dyn RngCore) -> bool {
    percent_chance(FLEE_CHANCE, rng).unwrap_or(false)
}

/// Resolve one player action plus the enemy response.
///
/// A potion that cannot be used returns an error and consumes no turn.
pub fn resolve_round(
    player: &mut Player,
    enemy: &mut Enemy,
    action: &CombatAction,
    rng: &mut dyn RngCore,
) -> Result<RoundReport, InventoryError> {
    let mut messages = Vec::new();

    match action {
        CombatAction::Attack => messages.push(player.attack(enemy, rng).message),
        CombatAction::Block => messages.push(player.block()),
        CombatAction::UsePotion(name) => messages.push(player.use_potion(name)?),
        CombatAction::Flee => {
            if attempt_flee(rng) {
                messages.push(format!("{} escapes!", player.name()));
                return Ok(RoundReport {
                    messages,
                    outcome: RoundOutcome::Fled,
                });
            }
            messages.push(format!(
                "{} fails to escape! {} seizes the opening.",
                player.name(),
                enemy.name()
            ));
        }
    }

    if !enemy.is_alive() {
        messages.extend(player.end_round());
        return Ok(RoundReport {
            messages,
            outcome: RoundOutcome::Victory,
        });
    }

    let reply = enemy_turn(enemy, player, rng);
    if !reply.is_empty() {
        messages.push(reply);
    }

    if !player.is_alive() {
        return Ok(RoundReport {
            messages,
            outcome: RoundOutcome::Defeat,
        });
    }

    messages.extend(player.end_round());
    Ok(RoundReport {
        messages,
        outcome: RoundOutcome::Continue,
    })
}
