//! Items: weapons, armor, potions and trade goods
//!
//! Every item carries the catalog key it was created under, so persistence
//! never has to reverse-lookup items by display name.

mod catalog;

pub use catalog::{Catalog, CatalogError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::combat::{Combatant, EntityEffects, PotionEffect};

/// An immutable item definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Catalog key (e.g., "iron_sword")
    pub key: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// Base value in gold
    pub value: u32,
    #[serde(flatten)]
    pub kind: ItemKind,
}

/// Variant-specific item data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemKind {
    Weapon(Weapon),
    Armor(Armor),
    Potion(Potion),
    Misc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    /// Flat damage bonus, always part of effective attack
    pub damage: i32,
    /// Dice rolled on each attack; falls back to `damage` when absent
    #[serde(default)]
    pub damage_dice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    pub defense: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Potion {
    #[serde(default)]
    pub heal_amount: u32,
    #[serde(default)]
    pub effect: Option<PotionEffect>,
}

/// A potion that neither healed nor carried an effect
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{potion} has no effect on {target}")]
pub struct NoEffect {
    pub potion: String,
    pub target: String,
}

impl Item {
    fn new(key: &str, name: &str, description: &str, value: u32, kind: ItemKind) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            value,
            kind,
        }
    }

    /// Create a weapon
    pub fn weapon(
        key: &str,
        name: &str,
        description: &str,
        value: u32,
        damage: i32,
        damage_dice: Option<&str>,
    ) -> Self {
        let weapon = Weapon {
            damage,
            damage_dice: damage_dice.map(str::to_string),
        };
        Self::new(key, name, description, value, ItemKind::Weapon(weapon))
    }

    /// Create a piece of armor
    pub fn armor(key: &str, name: &str, description: &str, value: u32, defense: i32) -> Self {
        Self::new(key, name, description, value, ItemKind::Armor(Armor { defense }))
    }

    /// Create a potion
    pub fn potion(
        key: &str,
        name: &str,
        description: &str,
        value: u32,
        heal_amount: u32,
        effect: Option<PotionEffect>,
    ) -> Self {
        let potion = Potion { heal_amount, effect };
        Self::new(key, name, description, value, ItemKind::Potion(potion))
    }

    /// Create a value-only item
    pub fn misc(key: &str, name: &str, description: &str, value: u32) -> Self {
        Self::new(key, name, description, value, ItemKind::Misc)
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            ItemKind::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_armor(&self) -> Option<&Armor> {
        match &self.kind {
            ItemKind::Armor(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_potion(&self) -> Option<&Potion> {
        match &self.kind {
            ItemKind::Potion(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this item can go into the weapon or armor slot
    pub fn is_equippable(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon(_) | ItemKind::Armor(_))
    }

    /// Case-insensitive display name comparison
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} (value: {} gold)", self.name, self.description, self.value)?;
        match &self.kind {
            ItemKind::Weapon(w) => match &w.damage_dice {
                Some(dice) => write!(f, " (damage: {} + {})", w.damage, dice),
                None => write!(f, " (damage: {})", w.damage),
            },
            ItemKind::Armor(a) => write!(f, " (defense: {})", a.defense),
            ItemKind::Potion(p) => {
                let mut details = Vec::new();
                if p.heal_amount > 0 {
                    details.push(format!("heals {} HP", p.heal_amount));
                }
                if let Some(effect) = &p.effect {
                    details.push(effect.to_string());
                }
                if details.is_empty() {
                    write!(f, " (no special effects)")
                } else {
                    write!(f, " ({})", details.join(", "))
                }
            }
            ItemKind::Misc => Ok(()),
        }
    }
}

impl Potion {
    /// Drink this potion.
    ///
    /// Healing at full health still counts as a use. Returns the combined
    /// description on success; on failure the caller must keep the potion.
    pub fn apply(
        &self,
        potion_name: &str,
        target: &mut Combatant,
        effects: &mut EntityEffects,
    ) -> Result<String, NoEffect> {
        let mut used = false;
        let mut messages = Vec::new();

        if self.heal_amount > 0 {
            let hp_before = target.hp;
            let healed = target.heal(self.heal_amount as i32);
            if healed > 0 {
                messages.push(format!(
                    "{} drinks {} and recovers {} HP ({}/{}).",
                    target.name, potion_name, healed, target.hp, target.max_hp
                ));
                used = true;
            } else if hp_before == target.max_hp {
                messages.push(format!(
                    "{} drinks {} but is already at full health.",
                    target.name, potion_name
                ));
                used = true;
            } else {
                warn!("{} produced no healing on {}", potion_name, target.name);
            }
        }

        if let Some(effect) = &self.effect {
            messages.push(format!(
                "{} feels the effect of {} ({}).",
                target.name, potion_name, effect
            ));
            effects.add(potion_name, effect.clone());
            used = true;
        }

        if !used {
            return Err(NoEffect {
                potion: potion_name.to_string(),
                target: target.name.clone(),
            });
        }

        info!("{} used {}", target.name, potion_name);
        Ok(messages.join(" "))
    }
}
