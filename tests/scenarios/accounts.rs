//! Account and per-user save scenario tests

use std::sync::Arc;

use crossroads::auth::{AccountStore, AuthError};
use crossroads::combat::Fighter;
use crossroads::game::{Game, NullSink};
use crossroads::items::Catalog;
use crossroads::persistence::SaveStore;
use crossroads::player::PlayerClass;

#[test]
fn test_register_then_login() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    let mut accounts = AccountStore::open(&path).unwrap();
    let created = accounts.register("alice", "hunter2").unwrap();

    let reopened = AccountStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.login("alice", "hunter2").unwrap(), created);
    assert_eq!(reopened.authenticate("alice"), Some(created));
    assert!(matches!(
        reopened.login("alice", "hunter3"),
        Err(AuthError::InvalidCredentials)
    ));
    assert!(reopened.authenticate("bob").is_none());
}

#[test]
fn test_each_user_has_own_save() {
    let dir = tempfile::tempdir().unwrap();
    let mut accounts = AccountStore::open(dir.path().join("accounts.json")).unwrap();
    let alice = accounts.register("alice", "pw-a").unwrap();
    let bob = accounts.register("bob the brave", "pw-b").unwrap();

    let catalog = Arc::new(Catalog::standard());
    let saves = dir.path().join("saves");

    let mut game = Game::new(
        catalog.clone(),
        SaveStore::new(&saves),
        alice.clone(),
        Box::new(NullSink),
    )
    .with_seed(61);
    game.create_player("Alice", PlayerClass::Mage).unwrap();
    game.save().unwrap();

    let mut game = Game::new(catalog.clone(), SaveStore::new(&saves), bob, Box::new(NullSink))
        .with_seed(62);
    game.create_player("Bob", PlayerClass::Warrior).unwrap();
    let bob_path = game.save().unwrap();
    assert_eq!(
        bob_path,
        saves.join(format!("x.{}_save.json", hex::encode("bob the brave")))
    );

    let mut game = Game::new(catalog, SaveStore::new(&saves), alice, Box::new(NullSink))
        .with_seed(63);
    game.load().unwrap();
    assert_eq!(game.player().unwrap().class, PlayerClass::Mage);
}

#[test]
fn test_lookalike_usernames_do_not_share_a_save() {
    let dir = tempfile::tempdir().unwrap();
    let mut accounts = AccountStore::open(dir.path().join("accounts.json")).unwrap();
    let spaced = accounts.register("a b", "pw-1").unwrap();
    let underscored = accounts.register("a_b", "pw-2").unwrap();

    let saves = SaveStore::new(dir.path().join("saves"));
    assert_ne!(saves.path_for(&spaced), saves.path_for(&underscored));

    let catalog = Arc::new(Catalog::standard());
    for (identity, name, class) in [
        (&spaced, "Spaced", PlayerClass::Mage),
        (&underscored, "Underscored", PlayerClass::Warrior),
    ] {
        let mut game = Game::new(
            catalog.clone(),
            saves.clone(),
            identity.clone(),
            Box::new(NullSink),
        )
        .with_seed(64);
        game.create_player(name, class).unwrap();
        game.save().unwrap();
    }

    let mut game = Game::new(catalog, saves, spaced, Box::new(NullSink)).with_seed(65);
    game.load().unwrap();
    assert_eq!(game.player().unwrap().name(), "Spaced");
    assert_eq!(game.player().unwrap().class, PlayerClass::Mage);
}
