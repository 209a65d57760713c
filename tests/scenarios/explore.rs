//! Exploration scenario tests

use crate::harness::GameTest;
use crossroads::combat::EncounterState;
use crossroads::game::{ExploreOutcome, GameError};
use crossroads::player::PlayerClass;

#[test]
fn test_explore_needs_a_character() {
    let mut t = GameTest::start(41);
    assert!(matches!(t.game.explore(), Err(GameError::NoPlayer)));
    assert_eq!(t.errors(), vec!["There is no active character.".to_string()]);
}

#[test]
fn test_explore_until_encounter() {
    let mut t = GameTest::with_player(42, PlayerClass::Warrior);

    let mut gold_found = 0;
    let mut items_found = 0;
    let enemy = loop {
        match t.game.explore().unwrap() {
            ExploreOutcome::Encounter(name) => break name,
            ExploreOutcome::FoundGold(amount) => gold_found += amount,
            ExploreOutcome::FoundItem(_) => items_found += 1,
            ExploreOutcome::Nothing => {}
        }
    };

    assert_eq!(t.game.state(), EncounterState::InCombat);
    assert!(t.game.enemy_status().unwrap().contains(&enemy));

    let player = t.game.player().unwrap();
    assert_eq!(player.gold, 20 + gold_found);
    assert_eq!(player.inventory.len(), 1 + items_found);

    assert!(matches!(t.game.explore(), Err(GameError::AlreadyInCombat)));
}

#[test]
fn test_found_items_come_from_catalog() {
    let mut t = GameTest::with_player(43, PlayerClass::Mage);

    let mut found = Vec::new();
    for _ in 0..300 {
        match t.game.explore().unwrap() {
            ExploreOutcome::FoundItem(item) => found.push(item),
            ExploreOutcome::Encounter(_) => {
                while t.game.state() == EncounterState::InCombat {
                    t.refill_player();
                    t.game.flee().unwrap();
                }
            }
            _ => {}
        }
    }

    assert!(!found.is_empty());
    for item in &found {
        let stock = t.game.catalog().get(&item.key).unwrap();
        assert_eq!(stock, item);
        assert!(!(item.is_equippable() && item.value >= 50));
    }
}
