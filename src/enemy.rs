//! Enemies: rewards, loot tables and natural attacks

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::combat::{roll_dice_with, Combatant, Fighter};
use crate::items::{Catalog, Item};

/// One independent loot roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootEntry {
    pub item_key: String,
    /// Percent chance, rolled as `1..=100 <= chance`
    pub chance: u32,
}

impl LootEntry {
    pub fn new(item_key: &str, chance: u32) -> Self {
        Self {
            item_key: item_key.to_string(),
            chance,
        }
    }
}

/// A hostile combatant spawned for one encounter
#[derive(Debug, Clone)]
pub struct Enemy {
    combatant: Combatant,
    /// Bestiary key this enemy was spawned from
    pub key: String,
    pub xp_reward: u32,
    pub gold_reward: u32,
    pub loot_table: Vec<LootEntry>,
    /// Dice expression for the natural attack (e.g., "1d4+1")
    pub attack_dice: String,
}

impl Enemy {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        key: &str,
        name: &str,
        max_hp: i32,
        attack: i32,
        defense: i32,
        xp_reward: u32,
        gold_reward: u32,
        loot_table: Vec<LootEntry>,
        attack_dice: &str,
    ) -> Self {
        Self {
            combatant: Combatant::new(name, max_hp, attack, defense),
            key: key.to_string(),
            xp_reward,
            gold_reward,
            loot_table,
            attack_dice: attack_dice.to_string(),
        }
    }

    /// Roll every loot entry independently.
    ///
    /// Keys missing from the catalog are logged and skipped.
    pub fn roll_loot<R: Rng + ?Sized>(&self, catalog: &Catalog, rng: &mut R) -> Vec<Item> {
        let mut drops = Vec::new();
        for entry in &self.loot_table {
            if rng.random_range(1..=100) > entry.chance {
                continue;
            }
            match catalog.instantiate(&entry.item_key) {
                Some(item) => drops.push(item),
                None => warn!(
                    "{} has unknown loot item {}",
                    self.combatant.name, entry.item_key
                ),
            }
        }

        if !drops.is_empty() {
            let names: Vec<&str> = drops.iter().map(|i| i.name.as_str()).collect();
            info!("{} drops {:?}", self.combatant.name, names);
        }
        drops
    }
}

impl Fighter for Enemy {
    fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    fn combatant_mut(&mut self) -> &mut Combatant {
        &mut self.combatant
    }

    fn damage_roll(&self, rng: &mut dyn RngCore) -> i32 {
        match roll_dice_with(&self.attack_dice, rng) {
            Ok(roll) => {
                debug!("{} rolls {} for {}", self.combatant.name, self.attack_dice, roll);
                roll
            }
            Err(e) => {
                error!("Bad attack dice on {}: {}", self.combatant.name, e);
                rng.random_range(1..=4)
            }
        }
    }
}

impl std::fmt::Display for Enemy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = &self.combatant;
        write!(
            f,
            "{} (HP: {}/{}, attack: {}, defense: {})",
            c.name, c.hp, c.max_hp, c.attack_power, c.defense_power
        )
    }
}
