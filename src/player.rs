//! The player character
//!
//! Handles:
//! - Class starting stats and equipment
//! - Inventory, equipment slots and potion use
//! - XP and level-ups
//! - Timed potion buffs feeding effective attack and defense

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::combat::{
    roll_dice_with, swing, Combatant, EntityEffects, Fighter, Stat,
};
use crate::items::{Catalog, Item, ItemKind, NoEffect};
use crate::names;
use crate::progression::{xp_threshold, LevelGains};

/// Gold every new character starts with
pub const STARTING_GOLD: u32 = 20;

/// Roll used when no weapon is equipped
pub const UNARMED_DICE: &str = "1d3";

/// Inventory and equipment errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("You don't have {0}.")]
    NotFound(String),

    #[error("{0} is neither a weapon nor armor.")]
    NotEquippable(String),

    #[error("{0} cannot be used that way.")]
    NotUsable(String),

    #[error(transparent)]
    NoEffect(#[from] NoEffect),

    #[error("There is no item number {0}.")]
    InvalidIndex(usize),
}

/// Character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerClass {
    #[default]
    Warrior,
    Mage,
}

/// Base stats for a fresh character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassStats {
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
}

impl PlayerClass {
    pub fn stats(&self) -> ClassStats {
        match self {
            PlayerClass::Warrior => ClassStats {
                max_hp: 100,
                attack: 10,
                defense: 5,
            },
            PlayerClass::Mage => ClassStats {
                max_hp: 70,
                attack: 8,
                defense: 3,
            },
        }
    }

    pub fn starting_weapon(&self) -> &'static str {
        match self {
            PlayerClass::Warrior => "old_sword",
            PlayerClass::Mage => "apprentice_staff_branch",
        }
    }

    pub fn starting_armor(&self) -> &'static str {
        match self {
            PlayerClass::Warrior => "leather_vest_worn",
            PlayerClass::Mage => "cloth_robe_simple",
        }
    }

    /// Potion handed out when a new character is created
    pub fn starter_potion(&self) -> &'static str {
        match self {
            PlayerClass::Warrior => "small_health_potion",
            PlayerClass::Mage => "medium_health_potion",
        }
    }
}

impl FromStr for PlayerClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warrior" => Ok(PlayerClass::Warrior),
            "mage" => Ok(PlayerClass::Mage),
            other => Err(format!("unknown class: {}", other)),
        }
    }
}

impl std::fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerClass::Warrior => write!(f, "Warrior"),
            PlayerClass::Mage => write!(f, "Mage"),
        }
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    combatant: Combatant,
    pub class: PlayerClass,
    /// Ordered, duplicates allowed
    pub inventory: Vec<Item>,
    pub gold: u32,
    /// XP accumulated toward the next level
    pub xp: u32,
    /// Starts at 1 and only increases
    pub level: u32,
    pub equipped_weapon: Option<Item>,
    pub equipped_armor: Option<Item>,
    effects: EntityEffects,
}

impl Player {
    /// Create a level 1 character with the class's starting equipment.
    ///
    /// An empty name is replaced by a generated one. The starter potion is
    /// not included; see `Game::create_player`.
    pub fn new(name: &str, class: PlayerClass, catalog: &Catalog) -> Self {
        let name = if name.trim().is_empty() {
            names::character_name(&mut rand::rng())
        } else {
            name.trim().to_string()
        };

        let stats = class.stats();
        let equipped_weapon = starting_item(catalog, class.starting_weapon());
        let equipped_armor = starting_item(catalog, class.starting_armor());

        info!("Created {} {}", class, name);
        Self {
            combatant: Combatant::new(&name, stats.max_hp, stats.attack, stats.defense),
            class,
            inventory: Vec::new(),
            gold: STARTING_GOLD,
            xp: 0,
            level: 1,
            equipped_weapon,
            equipped_armor,
            effects: EntityEffects::new(),
        }
    }

    /// Active timed effects
    pub fn effects(&self) -> &EntityEffects {
        &self.effects
    }

    /// Append an item to the inventory
    pub fn add_item(&mut self, item: Item) -> String {
        debug!("{} picked up {}", self.combatant.name, item.name);
        let message = format!("{} added to the inventory.", item.name);
        self.inventory.push(item);
        message
    }

    /// Remove the first item with a matching name (case-insensitive)
    pub fn remove_item(&mut self, name: &str) -> Option<Item> {
        let index = self.find_item(name)?;
        let item = self.inventory.remove(index);
        debug!("{} dropped {}", self.combatant.name, item.name);
        Some(item)
    }

    fn find_item(&self, name: &str) -> Option<usize> {
        self.inventory.iter().position(|i| i.name_matches(name))
    }

    /// Equip a weapon or armor by name; the displaced item goes back into the
    /// inventory
    pub fn equip(&mut self, name: &str) -> Result<String, InventoryError> {
        let index = self
            .find_item(name)
            .ok_or_else(|| InventoryError::NotFound(name.trim().to_string()))?;
        self.equip_at(index)
    }

    /// Equip the item at a 0-based inventory index
    pub fn equip_at(&mut self, index: usize) -> Result<String, InventoryError> {
        let item = self
            .inventory
            .get(index)
            .ok_or(InventoryError::InvalidIndex(index + 1))?;

        let slot = match item.kind {
            ItemKind::Weapon(_) => &mut self.equipped_weapon,
            ItemKind::Armor(_) => &mut self.equipped_armor,
            _ => return Err(InventoryError::NotEquippable(item.name.clone())),
        };

        let item = self.inventory.remove(index);
        let mut message = format!("Equipped {}.", item.name);
        info!("{} equipped {}", self.combatant.name, item.name);

        if let Some(old) = slot.replace(item) {
            message.push_str(&format!(" Unequipped {}.", old.name));
            self.inventory.push(old);
        }
        Ok(message)
    }

    /// Drink the first potion with a matching name.
    ///
    /// The potion is removed only when it had an effect.
    pub fn use_potion(&mut self, name: &str) -> Result<String, InventoryError> {
        let index = self
            .inventory
            .iter()
            .position(|i| i.as_potion().is_some() && i.name_matches(name))
            .ok_or_else(|| InventoryError::NotFound(name.trim().to_string()))?;
        self.use_potion_at(index)
    }

    fn use_potion_at(&mut self, index: usize) -> Result<String, InventoryError> {
        let item = self
            .inventory
            .get(index)
            .ok_or(InventoryError::InvalidIndex(index + 1))?;
        let potion = item
            .as_potion()
            .ok_or_else(|| InventoryError::NotUsable(item.name.clone()))?;

        match potion.apply(&item.name, &mut self.combatant, &mut self.effects) {
            Ok(message) => {
                self.inventory.remove(index);
                Ok(message)
            }
            Err(e) => {
                warn!("{}", e);
                Err(e.into())
            }
        }
    }

    /// Use the item at a 0-based inventory index: potions are drunk, weapons
    /// and armor equipped
    pub fn use_item_at(&mut self, index: usize) -> Result<String, InventoryError> {
        let item = self
            .inventory
            .get(index)
            .ok_or(InventoryError::InvalidIndex(index + 1))?;

        match item.kind {
            ItemKind::Potion(_) => self.use_potion_at(index),
            ItemKind::Weapon(_) | ItemKind::Armor(_) => self.equip_at(index),
            ItemKind::Misc => Err(InventoryError::NotUsable(item.name.clone())),
        }
    }

    /// XP still needed for the next level
    pub fn xp_to_next_level(&self) -> u32 {
        xp_threshold(self.level as i64)
    }

    /// Grant XP, leveling up as many times as the total allows
    pub fn add_xp<R: Rng + ?Sized>(&mut self, amount: u32, rng: &mut R) -> Vec<String> {
        self.xp = self.xp.saturating_add(amount);
        info!("{} gains {} XP (total {})", self.combatant.name, amount, self.xp);
        let mut messages = vec![format!("You gain {} XP.", amount)];

        let mut needed = xp_threshold(self.level as i64);
        while needed > 0 && self.xp >= needed {
            self.level = self.level.saturating_add(1);
            self.xp -= needed;

            let gains = LevelGains::roll(rng);
            let c = &mut self.combatant;
            c.max_hp = c.max_hp.saturating_add(gains.max_hp);
            c.hp = c.max_hp;
            c.attack_power = c.attack_power.saturating_add(gains.attack);
            c.defense_power = c.defense_power.saturating_add(gains.defense);

            info!("{} reached level {}", c.name, self.level);
            messages.push(format!(
                "Level up! You are now level {}. HP {}, attack {}, defense {}.",
                self.level, c.max_hp, c.attack_power, c.defense_power
            ));

            needed = xp_threshold(self.level as i64);
        }
        messages
    }

    /// Advance timed effects by one combat round
    pub fn end_round(&mut self) -> Vec<String> {
        self.effects
            .tick_all()
            .into_iter()
            .map(|source| format!("The effect of {} wears off.", source))
            .collect()
    }

    fn weapon_stats(&self) -> Option<&crate::items::Weapon> {
        self.equipped_weapon.as_ref().and_then(Item::as_weapon)
    }
}

fn starting_item(catalog: &Catalog, key: &str) -> Option<Item> {
    let item = catalog.instantiate(key);
    if item.is_none() {
        warn!("Starting item {} missing from catalog", key);
    }
    item
}

impl Fighter for Player {
    fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    fn combatant_mut(&mut self) -> &mut Combatant {
        &mut self.combatant
    }

    fn total_attack(&self) -> i32 {
        let weapon = self.weapon_stats().map_or(0, |w| w.damage);
        self.combatant
            .attack_power
            .saturating_add(weapon)
            .saturating_add(self.effects.modifier(Stat::AttackPower))
    }

    fn total_defense(&self) -> i32 {
        let armor = self
            .equipped_armor
            .as_ref()
            .and_then(Item::as_armor)
            .map_or(0, |a| a.defense);
        self.combatant
            .defense_power
            .saturating_add(armor)
            .saturating_add(self.effects.modifier(Stat::DefensePower))
    }

    fn damage_roll(&self, rng: &mut dyn RngCore) -> i32 {
        let Some(weapon) = self.weapon_stats() else {
            return roll_dice_with(UNARMED_DICE, rng).unwrap_or(1);
        };

        match &weapon.damage_dice {
            Some(dice) => match roll_dice_with(dice, rng) {
                Ok(roll) => {
                    debug!("{} rolls {} for {}", self.combatant.name, dice, roll);
                    roll
                }
                Err(e) => {
                    error!("Bad weapon dice on {}: {}", self.combatant.name, e);
                    weapon.damage
                }
            },
            None => weapon.damage,
        }
    }

    fn damage_jitter(&self, rng: &mut dyn RngCore) -> i32 {
        swing(rng)
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = &self.combatant;
        write!(
            f,
            "{} (HP: {}/{}, base attack: {}, base defense: {})",
            c.name, c.hp, c.max_hp, c.attack_power, c.defense_power
        )
    }
}
