//! Item catalog
//!
//! A read-only registry of every stock item, built once at startup and shared
//! by reference.

use std::collections::BTreeMap;

use thiserror::Error;

use super::{Item, ItemKind};
use crate::combat::{PotionEffect, Stat};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate item key: {0}")]
    DuplicateKey(String),
}

/// Registry of items keyed by catalog key
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<String, Item>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate keys
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for item in items {
            if map.contains_key(&item.key) {
                return Err(CatalogError::DuplicateKey(item.key));
            }
            map.insert(item.key.clone(), item);
        }
        Ok(Self { items: map })
    }

    /// The stock catalog shipped with the game
    pub fn standard() -> Self {
        let items = weapons()
            .into_iter()
            .chain(armors())
            .chain(potions())
            .chain(misc_items());
        Self::from_items(items).expect("stock item keys are unique")
    }

    /// Look up an item by key
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.items.get(key)
    }

    /// Clone an item out of the catalog
    pub fn instantiate(&self, key: &str) -> Option<Item> {
        self.items.get(key).cloned()
    }

    /// Whether `item` is exactly the catalog entry under its own key
    pub fn is_stock(&self, item: &Item) -> bool {
        self.items.get(&item.key).is_some_and(|stock| stock == item)
    }

    /// Iterate over all items in key order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Count items of a given variant group
    pub fn count_where(&self, pred: impl Fn(&ItemKind) -> bool) -> usize {
        self.items.values().filter(|i| pred(&i.kind)).count()
    }
}

fn weapons() -> Vec<Item> {
    vec![
        Item::weapon("splintered_club", "Splintered Club", "A piece of wood barely holding together.", 1, 1, Some("1d2")),
        Item::weapon("kitchen_knife", "Kitchen Knife", "Grabbed in a hurry, better than nothing.", 2, 1, Some("1d3")),
        Item::weapon("rusty_dagger", "Rusty Dagger", "Small and quick, but not very strong.", 3, 2, Some("1d4")),
        Item::weapon("old_sword", "Old Sword", "A basic sword for a novice warrior.", 0, 3, Some("1d6")),
        Item::weapon("hunting_spear_tip", "Hunting Spear Tip", "Just the head, no shaft. Awkward.", 4, 2, Some("1d4")),
        Item::weapon("apprentice_staff_branch", "Apprentice Staff Branch", "A broken staff, still a little magical.", 0, 2, Some("1d4+2")),
        Item::weapon("sling_with_pebbles", "Sling with Pebbles", "A child's toy, but a stone can still hurt.", 2, 1, Some("1d3")),
        Item::weapon("iron_dagger", "Iron Dagger", "A solid dagger, good for quick cuts.", 15, 3, Some("1d4+1")),
        Item::weapon("iron_sword", "Iron Sword", "A solid, well-balanced sword.", 25, 4, Some("1d8")),
        Item::weapon("steel_axe", "Steel Axe", "A heavy axe able to bite through armor.", 30, 5, Some("1d10")),
        Item::weapon("mages_wand", "Mage's Wand", "A wand that focuses magical energy.", 35, 3, Some("1d6+3")),
        Item::weapon("oak_staff", "Oak Staff", "A sturdy staff that strengthens simple spells.", 28, 4, Some("1d8+1")),
        Item::weapon("short_bow", "Short Bow", "A nimble bow for a scout.", 20, 3, Some("1d6+1")),
        Item::weapon("spiked_mace", "Spiked Mace", "A wooden club studded with iron spikes.", 22, 4, Some("2d4")),
        Item::weapon("war_hammer_light", "Light War Hammer", "A smaller take on the war hammer.", 26, 4, Some("1d8+1")),
        Item::weapon("knights_arming_sword", "Knight's Arming Sword", "The standard weapon of a knight.", 60, 6, Some("1d10+2")),
        Item::weapon("elven_shortsword", "Elven Shortsword", "Light and sharp, elven work.", 70, 5, Some("1d8+3")),
        Item::weapon("dwarven_waraxe", "Dwarven Waraxe", "Solid and reliable, like its makers.", 75, 7, Some("1d12+1")),
        Item::weapon("crystal_focus_staff", "Crystal Focus Staff", "A staff crowned with a magic crystal.", 80, 5, Some("2d6+3")),
        Item::weapon("longbow", "Longbow", "A mighty bow demanding strength and skill.", 55, 5, Some("1d8+2")),
        Item::weapon("morning_star", "Morning Star", "A spiked ball on a chain, fixed to a haft.", 65, 6, Some("2d6")),
        Item::weapon("obsidian_dagger", "Obsidian Dagger", "An uncommonly sharp blade of volcanic glass.", 50, 4, Some("1d6+2")),
        Item::weapon("masterwork_longsword", "Masterwork Longsword", "A flawlessly made sword.", 150, 8, Some("2d8+2")),
        Item::weapon("great_axe_of_cleaving", "Great Axe of Cleaving", "A huge axe able to split a foe in two.", 160, 10, Some("2d10")),
        Item::weapon("archmages_battle_staff", "Archmage's Battle Staff", "A staff steeped in offensive spells.", 180, 7, Some("3d6+3")),
        Item::weapon("composite_bow", "Composite Bow", "An advanced design with great draw strength.", 140, 7, Some("1d10+3")),
        Item::weapon("flanged_mace", "Flanged Mace", "A heavy mace with metal flanges, made for armored foes.", 130, 9, Some("2d8")),
        Item::weapon("shadowsteel_rapier", "Shadowsteel Rapier", "A slender, quick rapier of rare metal.", 170, 6, Some("1d8+4")),
        Item::weapon("blade_of_the_ancients", "Blade of the Ancients", "A legendary sword pulsing with arcane power.", 500, 12, Some("3d8+5")),
        Item::weapon("axe_of_the_berserker_lord", "Axe of the Berserker Lord", "An axe that seems to whisper promises of slaughter.", 550, 15, Some("2d12+5")),
        Item::weapon("staff_of_the_cosmos", "Staff of the Cosmos", "A shard of a star set in a staff.", 600, 10, Some("4d6+6")),
        Item::weapon("dragons_breath_bow", "Dragon's Breath Bow", "A bow whose arrows burst into flame.", 450, 10, Some("2d10+4")),
        Item::weapon("sunken_trident_of_depths", "Sunken Trident of the Depths", "A trident recovered from the ocean deep.", 480, 11, Some("3d6+3")),
    ]
}

fn armors() -> Vec<Item> {
    vec![
        Item::armor("rags", "Rags", "Scraps of clothing, almost no protection.", 1, 0),
        Item::armor("thick_clothes", "Thick Clothes", "A few layers of cloth, slightly better than nothing.", 2, 1),
        Item::armor("leather_vest_worn", "Worn Leather Vest", "Basic protection that has seen better days.", 0, 2),
        Item::armor("cloth_robe_simple", "Simple Cloth Robe", "A light robe offering minimal protection.", 0, 1),
        Item::armor("wooden_buckler", "Wooden Buckler", "A small wooden shield.", 3, 1),
        Item::armor("studded_leather_jerkin", "Studded Leather Jerkin", "Reinforced leather armor.", 20, 4),
        Item::armor("chainmail_shirt", "Chainmail Shirt", "Good protection against cuts.", 30, 6),
        Item::armor("mages_apprentice_robe", "Mage's Apprentice Robe", "A robe woven from simple magical thread.", 25, 3),
        Item::armor("iron_helmet_basic", "Basic Iron Helmet", "Protects the head from light blows.", 15, 2),
        Item::armor("reinforced_leather_armor", "Reinforced Leather Armor", "Thick leather with metal plates.", 28, 5),
        Item::armor("full_leather_armor", "Full Leather Armor", "A complete, well-fitted leather outfit.", 55, 7),
        Item::armor("steel_cuirass", "Steel Cuirass", "Solid protection for the torso.", 70, 9),
        Item::armor("enchanted_robe", "Enchanted Robe", "A robe imbued with basic protective spells.", 60, 5),
        Item::armor("knights_helmet", "Knight's Helmet", "A sturdy helmet with good head protection.", 40, 4),
        Item::armor("scale_mail", "Scale Mail", "Armor of many small overlapping plates.", 65, 8),
        Item::armor("plate_armor_standard", "Standard Plate Armor", "A full suit of plate, excellent protection.", 150, 13),
        Item::armor("shadow_weave_robe", "Shadow Weave Robe", "A light robe that seems to swallow light and blows.", 160, 9),
        Item::armor("dwarven_plate", "Dwarven Plate", "Extremely durable, if heavy.", 170, 15),
        Item::armor("elven_chainmail_fine", "Fine Elven Chainmail", "Light, durable and beautiful.", 140, 11),
        Item::armor("tower_shield", "Tower Shield", "A huge shield giving excellent cover.", 100, 7),
        Item::armor("armor_of_the_guardian", "Armor of the Guardian", "Legendary armor that seems to guard its wearer.", 500, 20),
        Item::armor("robes_of_the_archlich", "Robes of the Archlich", "Robes woven from souls and nightmares.", 550, 15),
        Item::armor("dragonscale_full_plate", "Dragonscale Full Plate", "Armor forged from ancient dragon scales.", 600, 25),
        Item::armor("aegis_of_the_fallen_god", "Aegis of the Fallen God", "A shield steeped in divine essence.", 450, 18),
        Item::armor("celestial_battle_robe", "Celestial Battle Robe", "A robe woven from starlight for holy warriors.", 520, 17),
    ]
}

fn modifier(stat: Stat, amount: i32, duration: u32) -> Option<PotionEffect> {
    Some(PotionEffect::Modifier { stat, amount, duration })
}

fn label(label: &str, duration: u32) -> Option<PotionEffect> {
    Some(PotionEffect::Label {
        label: label.to_string(),
        duration,
    })
}

fn potions() -> Vec<Item> {
    vec![
        Item::potion("weak_healing_draught", "Weak Healing Draught", "A cloudy liquid that heals minor scratches.", 5, 15, None),
        Item::potion("small_health_potion", "Small Health Potion", "Restores a little health.", 10, 30, None),
        Item::potion("medium_health_potion", "Medium Health Potion", "Restores a good amount of health.", 25, 60, None),
        Item::potion("large_health_potion", "Large Health Potion", "Mends most wounds completely.", 50, 120, None),
        Item::potion("elixir_of_pure_healing", "Elixir of Pure Healing", "A crystal-clear liquid that restores full vigor.", 100, 250, None),
        Item::potion("troll_blood_potion", "Troll Blood Potion", "Thick and foul, it speeds regeneration.", 70, 90, label("light_regeneration", 3)),
        Item::potion("potion_of_minor_strength", "Potion of Minor Strength", "Slightly increases physical strength.", 30, 0, modifier(Stat::AttackPower, 2, 3)),
        Item::potion("potion_of_ogres_strength", "Potion of Ogre's Strength", "Greatly increases physical strength.", 70, 0, modifier(Stat::AttackPower, 5, 3)),
        Item::potion("potion_of_cats_grace", "Potion of Cat's Grace", "Improves agility and evasion.", 35, 0, modifier(Stat::DefensePower, 2, 3)),
        Item::potion("potion_of_iron_skin", "Potion of Iron Skin", "Hardens the skin against blows.", 40, 0, modifier(Stat::DefensePower, 3, 3)),
        Item::potion("potion_of_mages_insight", "Potion of Mage's Insight", "Sharpens focus and magical power.", 45, 0, modifier(Stat::MagicPower, 4, 3)),
        Item::potion("potion_of_heroism", "Potion of Heroism", "Fills you with courage and boosts every combat ability.", 150, 20, label("all_stats_boost", 2)),
        Item::potion("antidote_weak", "Weak Antidote", "Neutralizes mild poisons.", 15, 0, label("cure_mild_poison", 0)),
        Item::potion("antidote_strong", "Strong Antidote", "Neutralizes strong poisons.", 40, 0, label("cure_strong_poison", 0)),
        Item::potion("potion_of_invisibility_short", "Potion of Short Invisibility", "Grants invisibility for a short time.", 60, 0, label("invisibility", 2)),
        Item::potion("potion_of_water_breathing", "Potion of Water Breathing", "Lets you breathe underwater.", 20, 0, label("water_breathing", 5)),
        Item::potion("philter_of_love_fake", "Fake Love Philter", "Smells of strawberries. Does nothing.", 5, 0, label("placebo", 0)),
    ]
}

fn misc_items() -> Vec<Item> {
    vec![
        Item::misc("iron_ore", "Iron Ore", "A lump of iron ore, ready for smelting.", 3),
        Item::misc("goblin_ear", "Goblin Ear", "A popular trophy, sometimes bought.", 1),
        Item::misc("wolf_pelt", "Wolf Pelt", "Good quality hide, fit for clothing.", 5),
        Item::misc("spider_silk", "Spider Silk", "Delicate but strong silk.", 8),
        Item::misc("glowing_mushroom", "Glowing Mushroom", "A faintly glowing mushroom used in alchemy.", 4),
        Item::misc("herbs_common", "Common Herbs", "A mix of ordinary healing herbs.", 2),
        Item::misc("rare_flower_petal", "Rare Flower Petal", "An ingredient of potent potions.", 15),
        Item::misc("chipped_gemstone", "Chipped Gemstone", "A small, damaged gem.", 7),
        Item::misc("flawed_ruby", "Flawed Ruby", "A ruby with inner flaws.", 20),
        Item::misc("sapphire_small", "Small Sapphire", "A glittering blue stone.", 50),
        Item::misc("emerald_decent", "Decent Emerald", "A beautiful green gem.", 120),
        Item::misc("diamond_perfect_tiny", "Tiny Perfect Diamond", "Even a small diamond is valuable.", 300),
        Item::misc("gold_ring_simple", "Simple Gold Ring", "A plain golden band.", 40),
        Item::misc("silver_necklace_worn", "Worn Silver Necklace", "Once beautiful, now a bit battered.", 25),
        Item::misc("ivory_figurine", "Ivory Figurine", "A small carved figurine.", 75),
        Item::misc("stale_bread", "Stale Bread", "Hard, but edible.", 1),
        Item::misc("dried_meat", "Dried Meat", "Keeps fresh for a long time.", 3),
        Item::misc("apple_red", "Red Apple", "Juicy and sweet.", 2),
        Item::misc("waterskin", "Waterskin", "Essential on the road.", 1),
        Item::misc("cheap_wine", "Cheap Wine", "Sour, but warming.", 4),
        Item::misc("tattered_scroll", "Tattered Scroll", "Illegible writing on old parchment.", 2),
        Item::misc("book_local_history", "Book of Local History", "Chronicles the surrounding lands.", 10),
        Item::misc("journal_adventurer", "Adventurer's Journal", "Notes of an unknown adventurer.", 15),
        Item::misc("map_fragment_unknown", "Unknown Map Fragment", "Part of a larger map of some unrecognizable place.", 8),
    ]
}
