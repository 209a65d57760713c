//! Save snapshots
//!
//! A save holds one player plus a location marker. Inventory entries are
//! catalog references when the item is stock and fully inlined otherwise.
//! Loading is lenient: anything missing or malformed falls back to a safe
//! default instead of failing the whole load.

mod store;

pub use store::{write_atomic, SaveError, SaveStore};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::combat::Fighter;
use crate::items::{Catalog, Item, ItemKind};
use crate::player::{Player, PlayerClass};

/// Format version written into every save
pub const SAVE_VERSION: &str = "1.1";

/// Name used when a save has none
pub const DEFAULT_NAME: &str = "Nameless";

/// Top-level save document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub player: PlayerRecord,
    pub location_marker: String,
    pub version: String,
    pub saved_at: String,
}

/// Persisted player fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub name: String,
    pub class: PlayerClass,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub gold: u32,
    pub xp: u32,
    pub level: u32,
    pub inventory: Vec<InventoryEntry>,
    pub equipped_weapon_key: Option<String>,
    pub equipped_armor_key: Option<String>,
    /// Present only when the equipped weapon is not a stock item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipped_weapon: Option<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipped_armor: Option<Item>,
}

/// One inventory slot in a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InventoryEntry {
    Reference {
        #[serde(rename = "itemKey")]
        item_key: String,
    },
    Inline(Item),
}

/// Result of a lenient load
#[derive(Debug, Clone)]
pub struct Restored {
    pub player: Player,
    /// `None` when the save carried no marker
    pub location_marker: Option<String>,
    pub version: Option<String>,
}

/// Capture the player and location into a save document
pub fn snapshot(player: &Player, location: &str, catalog: &Catalog) -> SaveState {
    let c = player.combatant();

    let inventory = player
        .inventory
        .iter()
        .map(|item| {
            if catalog.is_stock(item) {
                InventoryEntry::Reference {
                    item_key: item.key.clone(),
                }
            } else {
                debug!("Inlining non-stock item {}", item.key);
                InventoryEntry::Inline(item.clone())
            }
        })
        .collect();

    let (equipped_weapon_key, equipped_weapon) = equipped_entry(player.equipped_weapon.as_ref(), catalog);
    let (equipped_armor_key, equipped_armor) = equipped_entry(player.equipped_armor.as_ref(), catalog);

    SaveState {
        player: PlayerRecord {
            name: c.name.clone(),
            class: player.class,
            hp: c.hp,
            max_hp: c.max_hp,
            attack: c.attack_power,
            defense: c.defense_power,
            gold: player.gold,
            xp: player.xp,
            level: player.level,
            inventory,
            equipped_weapon_key,
            equipped_armor_key,
            equipped_weapon,
            equipped_armor,
        },
        location_marker: location.to_string(),
        version: SAVE_VERSION.to_string(),
        saved_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn equipped_entry(item: Option<&Item>, catalog: &Catalog) -> (Option<String>, Option<Item>) {
    match item {
        Some(item) if catalog.is_stock(item) => (Some(item.key.clone()), None),
        Some(item) => (None, Some(item.clone())),
        None => (None, None),
    }
}

/// Rebuild a player from a save document.
///
/// Never fails: missing or malformed fields get defaults, unknown items are
/// skipped with a warning, and missing equipment falls back to the class's
/// starting gear.
pub fn restore(document: &Value, catalog: &Catalog) -> Restored {
    let empty = Map::new();
    let record = document
        .get("player")
        .and_then(Value::as_object)
        .unwrap_or_else(|| {
            warn!("Save has no player section");
            &empty
        });

    let name = get_str(record, "name")
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_NAME);
    let class = get_str(record, "class")
        .and_then(|c| c.parse::<PlayerClass>().ok())
        .unwrap_or_else(|| {
            warn!("Save has no valid class, using {}", PlayerClass::default());
            PlayerClass::default()
        });

    let mut player = Player::new(name, class, catalog);
    let defaults = class.stats();

    {
        let c = player.combatant_mut();
        c.max_hp = get_int(record, "maxHp")
            .filter(|v| *v >= 1)
            .unwrap_or(defaults.max_hp);
        c.hp = get_int(record, "hp").unwrap_or(c.max_hp).clamp(0, c.max_hp);
        c.attack_power = get_int(record, "attack").unwrap_or(defaults.attack);
        c.defense_power = get_int(record, "defense").unwrap_or(defaults.defense);
    }
    player.gold = get_uint(record, "gold").unwrap_or(player.gold);
    player.xp = get_uint(record, "xp").unwrap_or(0);
    player.level = get_uint(record, "level").unwrap_or(1).max(1);

    player.inventory = record
        .get("inventory")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| restore_item(entry, catalog))
                .collect()
        })
        .unwrap_or_default();

    if let Some(weapon) = restore_equipped(record, "equippedWeaponKey", "equippedWeapon", catalog, |k| {
        matches!(k, ItemKind::Weapon(_))
    }) {
        player.equipped_weapon = Some(weapon);
    }
    if let Some(armor) = restore_equipped(record, "equippedArmorKey", "equippedArmor", catalog, |k| {
        matches!(k, ItemKind::Armor(_))
    }) {
        player.equipped_armor = Some(armor);
    }

    let version = document.get("version").and_then(Value::as_str).map(str::to_string);
    if version.as_deref() != Some(SAVE_VERSION) {
        warn!("Save version {:?} differs from {}", version, SAVE_VERSION);
    }

    Restored {
        player,
        location_marker: document
            .get("locationMarker")
            .and_then(Value::as_str)
            .map(str::to_string),
        version,
    }
}

fn get_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn get_int(record: &Map<String, Value>, key: &str) -> Option<i32> {
    record
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
}

fn get_uint(record: &Map<String, Value>, key: &str) -> Option<u32> {
    record
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

fn restore_item(entry: &Value, catalog: &Catalog) -> Option<Item> {
    match serde_json::from_value::<InventoryEntry>(entry.clone()) {
        Ok(InventoryEntry::Reference { item_key }) => {
            let item = catalog.instantiate(&item_key);
            if item.is_none() {
                warn!("Skipping unknown inventory item {}", item_key);
            }
            item
        }
        Ok(InventoryEntry::Inline(item)) => Some(item),
        Err(e) => {
            warn!("Skipping unreadable inventory entry {}: {}", entry, e);
            None
        }
    }
}

fn restore_equipped(
    record: &Map<String, Value>,
    key_field: &str,
    inline_field: &str,
    catalog: &Catalog,
    fits: impl Fn(&ItemKind) -> bool,
) -> Option<Item> {
    if let Some(key) = get_str(record, key_field) {
        match catalog.get(key) {
            Some(item) if fits(&item.kind) => return Some(item.clone()),
            Some(_) => warn!("{} {} is the wrong kind of item", key_field, key),
            None => warn!("{} {} not in catalog", key_field, key),
        }
    }

    let inline = record.get(inline_field)?;
    match serde_json::from_value::<Item>(inline.clone()) {
        Ok(item) if fits(&item.kind) => Some(item),
        Ok(item) => {
            warn!("{} {} is the wrong kind of item", inline_field, item.key);
            None
        }
        Err(e) => {
            warn!("Unreadable {}: {}", inline_field, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn warrior(catalog: &Catalog) -> Player {
        Player::new("Hero", PlayerClass::Warrior, catalog)
    }

    #[test]
    fn test_snapshot_references_stock_items() {
        let catalog = Catalog::standard();
        let mut player = warrior(&catalog);
        player.add_item(catalog.instantiate("wolf_pelt").unwrap());

        let state = snapshot(&player, "crossroads", &catalog);
        assert_eq!(state.version, "1.1");
        assert_eq!(
            state.player.inventory,
            vec![InventoryEntry::Reference {
                item_key: "wolf_pelt".to_string()
            }]
        );
        assert_eq!(state.player.equipped_weapon_key.as_deref(), Some("old_sword"));
        assert!(state.player.equipped_weapon.is_none());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["player"]["inventory"][0], json!({"itemKey": "wolf_pelt"}));
        assert_eq!(json["player"]["maxHp"], 100);
        assert_eq!(json["locationMarker"], "crossroads");
        assert!(json["player"].get("equippedWeapon").is_none());
    }

    #[test]
    fn test_snapshot_inlines_custom_items() {
        let catalog = Catalog::standard();
        let mut player = warrior(&catalog);
        let blade = Item::weapon("hero_blade", "Hero's Blade", "One of a kind.", 500, 9, Some("2d6"));
        player.add_item(blade.clone());
        player.equipped_armor = Some(Item::armor("hide", "Troll Hide", "Tough.", 40, 6));

        let state = snapshot(&player, "crossroads", &catalog);
        assert_eq!(state.player.inventory, vec![InventoryEntry::Inline(blade)]);
        assert_eq!(state.player.equipped_armor_key, None);
        assert_eq!(state.player.equipped_armor.as_ref().unwrap().key, "hide");
    }

    #[test]
    fn test_restore_round_trip() {
        let catalog = Catalog::standard();
        let mut player = warrior(&catalog);
        player.add_item(catalog.instantiate("small_health_potion").unwrap());
        player.add_item(Item::misc("lucky_coin", "Lucky Coin", "Heads every time.", 1));
        player.add_item(catalog.instantiate("iron_sword").unwrap());
        player.equip("Iron Sword").unwrap();
        player.gold = 77;
        player.xp = 42;
        player.level = 3;
        player.combatant_mut().max_hp = 120;
        player.combatant_mut().hp = 64;
        player.combatant_mut().attack_power = 13;

        let json = serde_json::to_value(snapshot(&player, "old mill", &catalog)).unwrap();
        let restored = restore(&json, &catalog);
        let loaded = &restored.player;

        assert_eq!(loaded.name(), "Hero");
        assert_eq!(loaded.class, PlayerClass::Warrior);
        assert_eq!(loaded.combatant(), player.combatant());
        assert_eq!(loaded.gold, 77);
        assert_eq!(loaded.xp, 42);
        assert_eq!(loaded.level, 3);
        assert_eq!(loaded.inventory, player.inventory);
        assert_eq!(loaded.equipped_weapon, player.equipped_weapon);
        assert_eq!(loaded.equipped_armor, player.equipped_armor);
        assert_eq!(restored.location_marker.as_deref(), Some("old mill"));
        assert_eq!(restored.version.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_restore_empty_document() {
        let catalog = Catalog::standard();
        let restored = restore(&json!({}), &catalog);
        let p = &restored.player;

        assert_eq!(p.name(), "Nameless");
        assert_eq!(p.class, PlayerClass::Warrior);
        assert_eq!(p.combatant().hp, 100);
        assert_eq!(p.gold, 20);
        assert_eq!(p.level, 1);
        assert!(p.inventory.is_empty());
        assert_eq!(p.equipped_weapon.as_ref().unwrap().key, "old_sword");
        assert!(restored.location_marker.is_none());
    }

    #[test]
    fn test_restore_is_lenient() {
        let catalog = Catalog::standard();
        let doc = json!({
            "player": {
                "name": "Morgana",
                "class": "Mage",
                "hp": 999,
                "maxHp": "lots",
                "gold": -5,
                "level": 0,
                "inventory": [
                    {"itemKey": "wolf_pelt"},
                    {"itemKey": "no_such_item"},
                    {"name": "Mystery", "type": "Weapon"},
                    42
                ],
                "equippedWeaponKey": "wolf_pelt",
                "equippedArmorKey": "ghost_armor"
            },
            "version": "1.0"
        });

        let restored = restore(&doc, &catalog);
        let p = &restored.player;
        assert_eq!(p.class, PlayerClass::Mage);
        assert_eq!(p.combatant().max_hp, 70);
        assert_eq!(p.combatant().hp, 70);
        assert_eq!(p.gold, 20);
        assert_eq!(p.level, 1);
        assert_eq!(p.inventory.len(), 1);
        assert_eq!(p.inventory[0].key, "wolf_pelt");
        assert_eq!(p.equipped_weapon.as_ref().unwrap().key, "apprentice_staff_branch");
        assert_eq!(p.equipped_armor.as_ref().unwrap().key, "cloth_robe_simple");
        assert_eq!(restored.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_restore_clamps_negative_hp() {
        let catalog = Catalog::standard();
        let doc = json!({"player": {"name": "Ghost", "hp": -20, "maxHp": 50}});
        let p = restore(&doc, &catalog).player;
        assert_eq!(p.combatant().hp, 0);
        assert_eq!(p.combatant().max_hp, 50);
    }

    #[test]
    fn test_restored_extreme_stats_fight_without_panicking() {
        use crate::bestiary::Bestiary;
        use crate::combat::resolve_round;
        use crate::combat::CombatAction;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let catalog = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(17);

        let doc = json!({"player": {"name": "X", "attack": 2147483647}});
        let strong = restore(&doc, &catalog).player;
        assert_eq!(strong.total_attack(), i32::MAX);
        let mut goblin = Bestiary::standard().spawn_by_key("goblin_scout").unwrap();
        let report = strong.attack(&mut goblin, &mut rng);
        assert!(report.potential >= i32::MAX - 1);
        assert!(!goblin.is_alive());

        let doc = json!({"player": {"name": "Y", "defense": 2147483647, "attack": -2147483648}});
        let mut stout = restore(&doc, &catalog).player;
        assert_eq!(stout.total_defense(), i32::MAX);
        let mut orc = Bestiary::standard().spawn_by_key("orc_grunt").unwrap();
        for action in [CombatAction::Block, CombatAction::Attack, CombatAction::Block] {
            let report = resolve_round(&mut stout, &mut orc, &action, &mut rng).unwrap();
            assert_eq!(report.outcome, crate::combat::RoundOutcome::Continue);
        }
        assert_eq!(stout.combatant().hp, stout.combatant().max_hp);
    }

    #[test]
    fn test_restore_inline_equipment() {
        let catalog = Catalog::standard();
        let mut player = warrior(&catalog);
        let blade = Item::weapon("hero_blade", "Hero's Blade", "One of a kind.", 500, 9, Some("2d6"));
        player.equipped_weapon = Some(blade.clone());

        let json = serde_json::to_value(snapshot(&player, "crossroads", &catalog)).unwrap();
        let p = restore(&json, &catalog).player;
        assert_eq!(p.equipped_weapon, Some(blade));
    }
}
