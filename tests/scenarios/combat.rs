//! Combat scenario tests

use crate::harness::GameTest;
use crossroads::bestiary::Bestiary;
use crossroads::combat::{CombatAction, EncounterState, Fighter, RoundOutcome};
use crossroads::enemy::Enemy;
use crossroads::game::{GameError, GameEvent};
use crossroads::items::{Catalog, Item};
use crossroads::player::{InventoryError, Player, PlayerClass};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn training_dummy() -> Enemy {
    Enemy::new("dummy", "Training Dummy", 10_000, 0, 2, 0, 0, Vec::new(), "1d1")
}

/// Observed damage range over many swings
fn damage_range(player: &Player, seed: u64) -> (i32, i32) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dummy = training_dummy();
    let (mut lo, mut hi) = (i32::MAX, i32::MIN);
    for _ in 0..2000 {
        dummy.combatant_mut().hp = 10_000;
        let taken = player
            .attack(&mut dummy, &mut rng)
            .damage
            .expect("Attack should land")
            .taken;
        lo = lo.min(taken);
        hi = hi.max(taken);
    }
    (lo, hi)
}

#[test]
fn test_plain_d6_weapon_damage_range() {
    let catalog = Catalog::standard();
    let mut player = Player::new("Hero", PlayerClass::Warrior, &catalog);
    player.equipped_weapon = Some(Item::weapon(
        "practice_blade",
        "Practice Blade",
        "Blunted steel.",
        1,
        0,
        Some("1d6"),
    ));

    assert_eq!(damage_range(&player, 11), (8, 15));
}

#[test]
fn test_old_sword_damage_range() {
    let catalog = Catalog::standard();
    let player = Player::new("Hero", PlayerClass::Warrior, &catalog);
    assert_eq!(player.equipped_weapon.as_ref().unwrap().key, "old_sword");

    assert_eq!(damage_range(&player, 12), (11, 18));
}

#[test]
fn test_full_fight_to_victory() {
    let mut t = GameTest::with_player(21, PlayerClass::Warrior);
    let enemy = t.game.start_encounter().unwrap();
    t.drain();

    assert_eq!(t.fight_to_end(), RoundOutcome::Victory);
    assert_eq!(t.game.state(), EncounterState::Idle);
    assert!(t.game.enemy().is_none());

    let messages = t.messages();
    assert!(messages.iter().any(|m| m == &format!("You defeated {}!", enemy)));
    assert!(messages.iter().any(|m| m.starts_with("You gain ")));
    assert!(t.game.player().unwrap().gold > 20);
}

#[test]
fn test_every_enemy_can_be_beaten() {
    let bestiary = Bestiary::standard();
    for (i, (key, _)) in bestiary.spawn_weights().iter().enumerate() {
        let only = Bestiary::new(
            [(key.clone(), bestiary.get(key).unwrap().clone())].into(),
            vec![(key.clone(), 1)],
        );
        let mut t = GameTest::start_with(100 + i as u64, only);
        t.game.create_player("Hero", PlayerClass::Mage).unwrap();

        t.game.start_encounter().unwrap();
        assert_eq!(t.game.enemy().unwrap().key, *key);
        assert_eq!(t.fight_to_end(), RoundOutcome::Victory, "fighting {}", key);
    }
}

#[test]
fn test_actions_outside_combat_are_rejected() {
    let mut t = GameTest::with_player(22, PlayerClass::Warrior);
    t.drain();

    assert!(matches!(
        t.game.player_action(CombatAction::Attack),
        Err(GameError::NotInCombat)
    ));
    assert!(matches!(t.game.flee(), Err(GameError::NotInCombat)));
    assert_eq!(t.errors().len(), 2);
}

#[test]
fn test_healing_potion_in_combat() {
    let mut t = GameTest::with_player(23, PlayerClass::Warrior);
    t.game.start_encounter().unwrap();
    t.game.player_mut().unwrap().combatant_mut().hp = 40;
    t.drain();

    let outcome = t
        .game
        .player_action(CombatAction::UsePotion("small health potion".to_string()))
        .unwrap();
    assert_eq!(outcome, RoundOutcome::Continue);

    let player = t.game.player().unwrap();
    assert!(player.inventory.is_empty());
    assert!(t
        .messages()
        .iter()
        .any(|m| m.contains("recovers 30 HP")));
}

#[test]
fn test_missing_potion_costs_nothing() {
    let mut t = GameTest::with_player(24, PlayerClass::Warrior);
    t.game.start_encounter().unwrap();
    let enemy_hp = t.game.enemy().unwrap().combatant().hp;
    let player_hp = t.game.player().unwrap().combatant().hp;
    t.drain();

    let result = t
        .game
        .player_action(CombatAction::UsePotion("Potion of Flight".to_string()));
    assert!(matches!(
        result,
        Err(GameError::Inventory(InventoryError::NotFound(_)))
    ));
    assert_eq!(t.game.enemy().unwrap().combatant().hp, enemy_hp);
    assert_eq!(t.game.player().unwrap().combatant().hp, player_hp);
    assert_eq!(t.errors().len(), 1);
}

#[test]
fn test_strength_buff_lasts_three_rounds() {
    let mut t = GameTest::with_player(25, PlayerClass::Warrior);
    let potion = t
        .game
        .catalog()
        .instantiate("potion_of_minor_strength")
        .unwrap();
    t.game.player_mut().unwrap().add_item(potion);
    t.game.start_encounter().unwrap();
    let base = t.game.player().unwrap().total_attack();
    t.drain();

    t.game
        .player_action(CombatAction::UsePotion(
            "Potion of Minor Strength".to_string(),
        ))
        .unwrap();
    assert_eq!(t.game.player().unwrap().total_attack(), base + 2);

    for _ in 0..2 {
        t.refill_player();
        t.game.player_action(CombatAction::Block).unwrap();
    }
    assert_eq!(t.game.player().unwrap().total_attack(), base);
    assert!(t
        .messages()
        .iter()
        .any(|m| m == "The effect of Potion of Minor Strength wears off."));
}

#[test]
fn test_defeat_ends_the_character() {
    let mut t = GameTest::with_player(26, PlayerClass::Mage);
    t.game.start_encounter().unwrap();
    {
        let player = t.game.player_mut().unwrap();
        player.equipped_armor = None;
        let c = player.combatant_mut();
        c.hp = 1;
        c.defense_power = -50;
    }
    t.drain();

    assert_eq!(
        t.game.player_action(CombatAction::Block).unwrap(),
        RoundOutcome::Defeat
    );
    assert!(t.game.player().is_none());
    assert!(t
        .drain()
        .contains(&GameEvent::CombatEnded(RoundOutcome::Defeat)));

    assert!(matches!(t.game.explore(), Err(GameError::NoPlayer)));
    t.game.create_player("Second", PlayerClass::Warrior).unwrap();
    assert!(t.game.explore().is_ok());
}
