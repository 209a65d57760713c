//! Progression scenario tests

use crate::harness::GameTest;
use crossroads::combat::{Fighter, RoundOutcome};
use crossroads::items::Catalog;
use crossroads::player::{Player, PlayerClass};
use crossroads::progression::xp_threshold;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_threshold_curve() {
    let thresholds: Vec<u32> = (1..=4).map(xp_threshold).collect();
    assert_eq!(thresholds, vec![120, 339, 623, 960]);
}

#[test]
fn test_exact_threshold_levels_once() {
    let catalog = Catalog::standard();
    let mut rng = StdRng::seed_from_u64(31);
    let mut player = Player::new("Hero", PlayerClass::Warrior, &catalog);
    player.combatant_mut().hp = 50;

    let messages = player.add_xp(120, &mut rng);
    assert_eq!(player.level, 2);
    assert_eq!(player.xp, 0);
    assert_eq!(player.xp_to_next_level(), 339);
    assert_eq!(messages.len(), 2);

    let c = player.combatant();
    assert_eq!(c.max_hp, 110);
    assert_eq!(c.hp, 110);
    assert!((11..=12).contains(&c.attack_power));
    assert!((5..=6).contains(&c.defense_power));
}

#[test]
fn test_big_grant_crosses_several_levels() {
    let catalog = Catalog::standard();
    let mut rng = StdRng::seed_from_u64(32);
    let mut player = Player::new("Hero", PlayerClass::Mage, &catalog);

    player.add_xp(120 + 339 + 10, &mut rng);
    assert_eq!(player.level, 3);
    assert_eq!(player.xp, 10);
    assert_eq!(player.combatant().max_hp, 90);
}

#[test]
fn test_victory_can_level_up() {
    let mut t = GameTest::with_player(33, PlayerClass::Warrior);
    t.game.start_encounter().unwrap();
    t.game.enemy_mut().unwrap().xp_reward = 150;
    t.drain();

    assert_eq!(t.fight_to_end(), RoundOutcome::Victory);
    let player = t.game.player().unwrap();
    assert_eq!(player.level, 2);
    assert_eq!(player.xp, 30);
    assert!(t.messages().iter().any(|m| m.starts_with("Level up!")));

    let status = t.game.player_status().unwrap();
    assert_eq!(status.level, 2);
    assert_eq!(status.xp_to_next, 339);
}
