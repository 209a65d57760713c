//! Save/load scenario tests

use crate::harness::GameTest;
use crossroads::combat::{EncounterState, Fighter, RoundOutcome};
use crossroads::game::{GameError, GameEvent};
use crossroads::items::Item;
use crossroads::persistence::{SaveError, SAVE_VERSION};
use crossroads::player::PlayerClass;
use serde_json::{json, Value};

fn read_save(t: &GameTest) -> Value {
    let content = std::fs::read_to_string(t.save_path()).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_save_file_layout() {
    let mut t = GameTest::with_player(51, PlayerClass::Warrior);
    let path = t.game.save().unwrap();
    assert_eq!(path, t.save_dir().join("tester_save.json"));

    let doc = read_save(&t);
    assert_eq!(doc["version"], SAVE_VERSION);
    assert_eq!(doc["player"]["name"], "Hero");
    assert_eq!(doc["player"]["class"], "Warrior");
    assert_eq!(doc["player"]["gold"], 20);
    assert_eq!(doc["player"]["equippedWeaponKey"], "old_sword");
    assert_eq!(doc["player"]["equippedArmorKey"], "leather_vest_worn");
    assert_eq!(
        doc["player"]["inventory"],
        json!([{ "itemKey": "small_health_potion" }])
    );
    assert!(doc["savedAt"].is_string());
}

#[test]
fn test_restart_and_load() {
    let mut t = GameTest::with_player(52, PlayerClass::Mage);
    t.game.start_encounter().unwrap();
    assert_eq!(t.fight_to_end(), RoundOutcome::Victory);
    {
        let player = t.game.player_mut().unwrap();
        player.combatant_mut().hp = 33;
    }
    let before = t.game.player_status().unwrap();
    let inventory = t.game.player().unwrap().inventory.clone();
    t.game.save().unwrap();

    t.restart(99);
    assert!(t.game.player().is_none());
    t.game.load().unwrap();

    assert_eq!(t.game.player_status().unwrap(), before);
    assert_eq!(t.game.player().unwrap().inventory, inventory);
    assert!(t
        .messages()
        .iter()
        .any(|m| m == "Game loaded for Hero."));
}

#[test]
fn test_custom_items_survive_round_trip() {
    let mut t = GameTest::with_player(53, PlayerClass::Warrior);
    let blade = Item::weapon(
        "heirloom_blade",
        "Heirloom Blade",
        "Passed down three generations.",
        120,
        6,
        Some("2d4"),
    );
    let trinket = Item::misc("lucky_coin", "Lucky Coin", "Worn smooth.", 1);
    {
        let player = t.game.player_mut().unwrap();
        player.add_item(trinket.clone());
        player.equipped_weapon = Some(blade.clone());
    }
    t.game.save().unwrap();

    let doc = read_save(&t);
    assert!(doc["player"]["equippedWeaponKey"].is_null());
    assert_eq!(doc["player"]["equippedWeapon"]["key"], "heirloom_blade");
    assert_eq!(doc["player"]["inventory"][1]["key"], "lucky_coin");

    t.restart(53);
    t.game.load().unwrap();
    let player = t.game.player().unwrap();
    assert_eq!(player.equipped_weapon.as_ref(), Some(&blade));
    assert_eq!(player.inventory.last(), Some(&trinket));
}

#[test]
fn test_hand_written_save_is_loaded_leniently() {
    let mut t = GameTest::start(54);
    let doc = json!({
        "player": {
            "name": "Old Tom",
            "class": "Mage",
            "hp": 12,
            "maxHp": 80,
            "gold": 7,
            "level": 2,
            "inventory": [
                { "itemKey": "wolf_pelt" },
                { "itemKey": "dragon_scale" },
                { "itemKey": "iron_ore" }
            ]
        },
        "locationMarker": "The old mill."
    });
    std::fs::write(t.save_path(), doc.to_string()).unwrap();

    t.game.load().unwrap();
    assert_eq!(t.game.location(), "The old mill.");

    let player = t.game.player().unwrap();
    assert_eq!(player.name(), "Old Tom");
    assert_eq!(player.class, PlayerClass::Mage);
    assert_eq!(player.combatant().hp, 12);
    assert_eq!(player.combatant().max_hp, 80);
    assert_eq!(player.level, 2);
    assert_eq!(player.xp, 0);
    let keys: Vec<&str> = player.inventory.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(keys, vec!["wolf_pelt", "iron_ore"]);
    assert_eq!(
        player.equipped_weapon.as_ref().map(|i| i.key.as_str()),
        Some("apprentice_staff_branch")
    );
}

#[test]
fn test_corrupt_save_changes_nothing() {
    let mut t = GameTest::with_player(55, PlayerClass::Warrior);
    t.game.player_mut().unwrap().gold = 77;
    std::fs::write(t.save_path(), "{\"player\": ").unwrap();
    t.drain();

    assert!(matches!(
        t.game.load(),
        Err(GameError::Save(SaveError::Json(_)))
    ));
    assert_eq!(t.game.player().unwrap().gold, 77);
    assert_eq!(t.errors().len(), 1);
}

#[test]
fn test_load_mid_fight_ends_the_fight() {
    let mut t = GameTest::with_player(56, PlayerClass::Warrior);
    t.game.save().unwrap();
    t.game.start_encounter().unwrap();
    t.drain();

    t.game.load().unwrap();
    assert_eq!(t.game.state(), EncounterState::Idle);
    assert!(t.game.enemy().is_none());
    assert!(t.drain().contains(&GameEvent::CombatEnded(RoundOutcome::Fled)));
}
