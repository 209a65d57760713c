//! Integration test harness
//!
//! `GameTest` owns a seeded `Game` whose save directory lives in a temp dir
//! and whose events are collected over a channel for inspection.
//!
//! ```rust,ignore
//! let mut t = GameTest::with_player(7, PlayerClass::Warrior);
//! t.game.start_encounter().unwrap();
//! let outcome = t.fight_to_end();
//! assert_eq!(outcome, RoundOutcome::Victory);
//! ```

use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

use crossroads::auth::Identity;
use crossroads::bestiary::Bestiary;
use crossroads::combat::{CombatAction, Fighter, RoundOutcome};
use crossroads::game::{Game, GameEvent};
use crossroads::items::Catalog;
use crossroads::persistence::SaveStore;
use crossroads::player::PlayerClass;
use tempfile::TempDir;

/// Rounds allowed before a fight is considered stuck
const MAX_ROUNDS: usize = 200;

pub struct GameTest {
    pub game: Game,
    events: mpsc::Receiver<GameEvent>,
    dir: TempDir,
    identity: Identity,
}

impl GameTest {
    /// Fresh session with no character
    pub fn start(seed: u64) -> Self {
        Self::start_with(seed, Bestiary::standard())
    }

    /// Fresh session drawing enemies from `bestiary`
    pub fn start_with(seed: u64, bestiary: Bestiary) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let identity = Identity::new("test-id", "tester");
        let (game, events) = Self::open(dir.path(), &identity, seed);
        let game = game.with_bestiary(bestiary);
        Self {
            game,
            events,
            dir,
            identity,
        }
    }

    /// Session with a character named Hero
    pub fn with_player(seed: u64, class: PlayerClass) -> Self {
        let mut t = Self::start(seed);
        t.game
            .create_player("Hero", class)
            .expect("Failed to create player");
        t
    }

    fn open(dir: &Path, identity: &Identity, seed: u64) -> (Game, mpsc::Receiver<GameEvent>) {
        let (tx, rx) = mpsc::channel();
        let game = Game::new(
            Arc::new(Catalog::standard()),
            SaveStore::new(dir),
            identity.clone(),
            Box::new(tx),
        )
        .with_seed(seed);
        (game, rx)
    }

    /// Replace the session with a new one over the same save directory,
    /// as if the program had been restarted
    pub fn restart(&mut self, seed: u64) {
        let (game, events) = Self::open(self.dir.path(), &self.identity, seed);
        self.game = game;
        self.events = events;
    }

    pub fn save_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn save_path(&self) -> std::path::PathBuf {
        SaveStore::new(self.dir.path()).path_for(&self.identity)
    }

    /// Everything emitted since the last drain
    pub fn drain(&self) -> Vec<GameEvent> {
        self.events.try_iter().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Keep the player topped up so only the enemy can fall
    pub fn refill_player(&mut self) {
        if let Some(player) = self.game.player_mut() {
            let c = player.combatant_mut();
            c.hp = c.max_hp;
        }
    }

    /// Attack until the fight is decided, healing the player between rounds
    pub fn fight_to_end(&mut self) -> RoundOutcome {
        for _ in 0..MAX_ROUNDS {
            self.refill_player();
            let outcome = self
                .game
                .player_action(CombatAction::Attack)
                .expect("Attack failed");
            if outcome != RoundOutcome::Continue {
                return outcome;
            }
        }
        panic!("Fight did not finish in {} rounds", MAX_ROUNDS);
    }
}
