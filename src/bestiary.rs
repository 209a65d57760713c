//! Enemy definitions and spawn weights

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::combat::weighted_choice;
use crate::enemy::{Enemy, LootEntry};

/// Attack dice used when a definition omits one
pub const DEFAULT_ATTACK_DICE: &str = "1d4";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("the spawn table is empty")]
    EmptyTable,

    #[error("no enemy definition for {0}")]
    UnknownEnemy(String),
}

/// Template an enemy is spawned from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDefinition {
    pub name: String,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub xp: u32,
    pub gold: u32,
    #[serde(default = "default_attack_dice")]
    pub attack_dice: String,
    #[serde(default)]
    pub loot_table: Vec<LootEntry>,
}

fn default_attack_dice() -> String {
    DEFAULT_ATTACK_DICE.to_string()
}

/// Known enemies plus the weights they are drawn with
#[derive(Debug, Clone, Default)]
pub struct Bestiary {
    definitions: BTreeMap<String, EnemyDefinition>,
    spawn_weights: Vec<(String, u32)>,
}

impl Bestiary {
    pub fn new(
        definitions: BTreeMap<String, EnemyDefinition>,
        spawn_weights: Vec<(String, u32)>,
    ) -> Self {
        Self {
            definitions,
            spawn_weights,
        }
    }

    /// The four creatures of the crossroads
    pub fn standard() -> Self {
        let mut definitions = BTreeMap::new();
        let mut add = |key: &str,
                       name: &str,
                       (hp, attack, defense): (i32, i32, i32),
                       (xp, gold): (u32, u32),
                       attack_dice: &str,
                       loot: &[(&str, u32)]| {
            definitions.insert(
                key.to_string(),
                EnemyDefinition {
                    name: name.to_string(),
                    hp,
                    attack,
                    defense,
                    xp,
                    gold,
                    attack_dice: attack_dice.to_string(),
                    loot_table: loot.iter().map(|(k, c)| LootEntry::new(k, *c)).collect(),
                },
            );
        };

        add(
            "goblin_scout",
            "Goblin Scout",
            (30, 3, 2),
            (25, 10),
            "1d4+1",
            &[("small_health_potion", 30), ("rusty_dagger", 15)],
        );
        add(
            "orc_grunt",
            "Orc Grunt",
            (60, 5, 4),
            (50, 20),
            "1d8+2",
            &[
                ("iron_sword", 10),
                ("medium_health_potion", 20),
                ("wolf_pelt", 40),
            ],
        );
        add(
            "dark_wolf",
            "Dark Wolf",
            (45, 4, 3),
            (35, 15),
            "2d4",
            &[("wolf_pelt", 60), ("chipped_gemstone", 10)],
        );
        add(
            "forest_spider",
            "Forest Spider",
            (25, 3, 1),
            (20, 5),
            "1d6",
            &[("spider_silk", 50), ("antidote_weak", 10)],
        );

        let spawn_weights = [
            ("goblin_scout", 40),
            ("orc_grunt", 20),
            ("dark_wolf", 30),
            ("forest_spider", 35),
        ]
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect();

        Self::new(definitions, spawn_weights)
    }

    pub fn get(&self, key: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(key)
    }

    pub fn spawn_weights(&self) -> &[(String, u32)] {
        &self.spawn_weights
    }

    /// Instantiate a fresh enemy at full health
    pub fn spawn_by_key(&self, key: &str) -> Option<Enemy> {
        let Some(def) = self.definitions.get(key) else {
            warn!("No enemy definition for {}", key);
            return None;
        };
        debug!("Spawning {}", key);
        Some(Enemy::new(
            key,
            &def.name,
            def.hp,
            def.attack,
            def.defense,
            def.xp,
            def.gold,
            def.loot_table.clone(),
            &def.attack_dice,
        ))
    }

    /// Draw a key from the spawn table and instantiate it
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Enemy, SpawnError> {
        let key = weighted_choice(self.spawn_weights.as_slice(), rng).ok_or(SpawnError::EmptyTable)?;
        self.spawn_by_key(key)
            .ok_or_else(|| SpawnError::UnknownEnemy(key.clone()))
    }
}
