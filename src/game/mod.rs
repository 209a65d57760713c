//! Game controller
//!
//! Owns the player, the current enemy and the RNG, and drives the encounter
//! state machine:
//!
//! ```text
//! Idle --explore/start_encounter--> InCombat --victory/defeat/flee--> Idle
//! ```
//!
//! Every operation reports through the event sink. Failed operations leave
//! the game unchanged and are reported as `GameEvent::Error`.

mod command;
mod events;

pub use command::{Command, CommandError};
pub use events::{EventSink, GameEvent, NullSink};

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::auth::Identity;
use crate::bestiary::{Bestiary, SpawnError};
use crate::combat::{
    resolve_round, weighted_choice, CombatAction, DiceRoll, EncounterState, Fighter, RoundOutcome,
};
use crate::enemy::Enemy;
use crate::items::{Catalog, Item, ItemKind};
use crate::names;
use crate::persistence::{restore, snapshot, SaveError, SaveStore};
use crate::player::{InventoryError, Player, PlayerClass};

/// Where a new game starts
pub const DEFAULT_LOCATION: &str = "You stand at a crossroads. What will you do?";

/// Explore roll thresholds on 1d100
const FIND_ITEM_MAX: i32 = 15;
const ENCOUNTER_MAX: i32 = 75;
const FIND_GOLD_MAX: i32 = 90;

/// Weapons and armor at or above this value never turn up while exploring
const FIND_VALUE_CAP: u32 = 50;

/// Item finds with a boosted weight
const FIND_WEIGHTS: &[(&str, u32)] = &[
    ("small_health_potion", 10),
    ("stale_bread", 8),
    ("iron_ore", 5),
];

/// Game-level errors
#[derive(Debug, Error)]
pub enum GameError {
    #[error("There is no active character.")]
    NoPlayer,

    #[error("You are not in combat.")]
    NotInCombat,

    #[error("You are in the middle of a fight!")]
    AlreadyInCombat,

    #[error("You cannot do that while defeated.")]
    PlayerDefeated,

    #[error("Invalid item number {0}.")]
    InvalidIndex(usize),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// What an exploration turned up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreOutcome {
    FoundItem(Item),
    Encounter(String),
    FoundGold(u32),
    Nothing,
}

/// Read-only view of the player for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub name: String,
    pub class: PlayerClass,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub attack: i32,
    pub defense: i32,
    pub total_attack: i32,
    pub total_defense: i32,
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub effects: Vec<String>,
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({}) level {}", self.name, self.class, self.level)?;
        writeln!(
            f,
            "HP: {}/{}  Gold: {}  XP: {}/{}",
            self.hp, self.max_hp, self.gold, self.xp, self.xp_to_next
        )?;
        write!(
            f,
            "Attack: {} ({} base)  Defense: {} ({} base)",
            self.total_attack, self.attack, self.total_defense, self.defense
        )?;
        if let Some(weapon) = &self.weapon {
            write!(f, "\nWeapon: {}", weapon)?;
        }
        if let Some(armor) = &self.armor {
            write!(f, "\nArmor: {}", armor)?;
        }
        for effect in &self.effects {
            write!(f, "\nEffect: {}", effect)?;
        }
        Ok(())
    }
}

/// Single-player game session
pub struct Game {
    catalog: Arc<Catalog>,
    bestiary: Bestiary,
    player: Option<Player>,
    enemy: Option<Enemy>,
    state: EncounterState,
    location: String,
    rng: StdRng,
    sink: Box<dyn EventSink>,
    store: SaveStore,
    identity: Identity,
}

impl Game {
    /// Create a session with an OS-seeded RNG and no character
    pub fn new(
        catalog: Arc<Catalog>,
        store: SaveStore,
        identity: Identity,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self {
            catalog,
            bestiary: Bestiary::standard(),
            player: None,
            enemy: None,
            state: EncounterState::Idle,
            location: DEFAULT_LOCATION.to_string(),
            rng: StdRng::from_os_rng(),
            sink,
            store,
            identity,
        }
    }

    /// Use a fixed seed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn with_bestiary(mut self, bestiary: Bestiary) -> Self {
        self.bestiary = bestiary;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn enemy_mut(&mut self) -> Option<&mut Enemy> {
        self.enemy.as_mut()
    }

    fn say(&mut self, message: impl Into<String>) {
        self.sink.emit(GameEvent::Message(message.into()));
    }

    /// Push a failure to the sink and pass it through
    fn checked<T>(&mut self, result: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(e) = &result {
            debug!("Operation failed: {}", e);
            self.sink.emit(GameEvent::Error(e.to_string()));
        }
        result
    }

    fn living_player(&self) -> Result<&Player, GameError> {
        let player = self.player.as_ref().ok_or(GameError::NoPlayer)?;
        if !player.is_alive() {
            return Err(GameError::PlayerDefeated);
        }
        Ok(player)
    }

    /// Start a new character, replacing any current one
    pub fn create_player(&mut self, name: &str, class: PlayerClass) -> Result<(), GameError> {
        let result = self.create_player_inner(name, class);
        self.checked(result)
    }

    fn create_player_inner(&mut self, name: &str, class: PlayerClass) -> Result<(), GameError> {
        if self.state == EncounterState::InCombat {
            return Err(GameError::AlreadyInCombat);
        }

        let name = if name.trim().is_empty() {
            names::character_name(&mut self.rng)
        } else {
            name.to_string()
        };
        let mut player = Player::new(&name, class, &self.catalog);
        match self.catalog.instantiate(class.starter_potion()) {
            Some(potion) => {
                player.add_item(potion);
            }
            None => warn!("Starter potion {} missing from catalog", class.starter_potion()),
        }

        info!("New character {} the {}", player.name(), class);
        let welcome = format!("Welcome, {} the {}!", player.name(), class);
        self.player = Some(player);
        self.enemy = None;
        self.state = EncounterState::Idle;
        self.say(welcome);
        Ok(())
    }

    /// Look around: find an item, meet an enemy, find gold or nothing
    pub fn explore(&mut self) -> Result<ExploreOutcome, GameError> {
        let result = self.explore_inner();
        self.checked(result)
    }

    fn explore_inner(&mut self) -> Result<ExploreOutcome, GameError> {
        if self.state == EncounterState::InCombat {
            return Err(GameError::AlreadyInCombat);
        }
        let name = self.living_player()?.name().to_string();

        self.say("You look around...");
        let roll = DiceRoll::new(1, 100, 0).roll_with(&mut self.rng);
        debug!("{} explores, rolled {}", name, roll);

        if roll <= FIND_ITEM_MAX {
            Ok(self.find_item())
        } else if roll <= ENCOUNTER_MAX {
            let enemy = self.start_encounter_inner()?;
            Ok(ExploreOutcome::Encounter(enemy))
        } else if roll <= FIND_GOLD_MAX {
            Ok(self.find_gold())
        } else {
            self.say("Nothing interesting happens.");
            Ok(ExploreOutcome::Nothing)
        }
    }

    /// Weighted pick over everything but valuable weapons and armor
    fn find_item(&mut self) -> ExploreOutcome {
        let choices: Vec<(&str, u32)> = self
            .catalog
            .iter()
            .filter(|item| {
                !matches!(item.kind, ItemKind::Weapon(_) | ItemKind::Armor(_))
                    || item.value < FIND_VALUE_CAP
            })
            .map(|item| {
                let weight = FIND_WEIGHTS
                    .iter()
                    .find(|(key, _)| *key == item.key)
                    .map_or(1, |(_, w)| *w);
                (item.key.as_str(), weight)
            })
            .collect();

        let found = weighted_choice(choices.as_slice(), &mut self.rng)
            .and_then(|key| self.catalog.instantiate(key));

        let Some(item) = found else {
            self.say("Something glinted in the grass, but it vanished before you could react.");
            return ExploreOutcome::Nothing;
        };
        if let Some(player) = self.player.as_mut() {
            info!("{} found {}", player.name(), item.name);
            player.add_item(item.clone());
        }
        self.say(format!("You found {}!", item.name));
        ExploreOutcome::FoundItem(item)
    }

    fn find_gold(&mut self) -> ExploreOutcome {
        let amount = DiceRoll::new(2, 10, 0).roll_with(&mut self.rng).max(0) as u32;
        if let Some(player) = self.player.as_mut() {
            player.gold = player.gold.saturating_add(amount);
            info!("{} found {} gold", player.name(), amount);
        }
        self.say(format!("You found a pouch with {} gold!", amount));
        ExploreOutcome::FoundGold(amount)
    }

    /// Spawn an enemy from the weighted table and enter combat
    pub fn start_encounter(&mut self) -> Result<String, GameError> {
        let result = self.start_encounter_inner();
        self.checked(result)
    }

    fn start_encounter_inner(&mut self) -> Result<String, GameError> {
        if self.state == EncounterState::InCombat {
            return Err(GameError::AlreadyInCombat);
        }
        let player_name = self.living_player()?.name().to_string();

        let enemy = self.bestiary.spawn(&mut self.rng).map_err(|e| {
            error!("Could not spawn an enemy: {}", e);
            e
        })?;

        let name = enemy.name().to_string();
        info!("Combat started: {} vs {}", player_name, name);
        let description = enemy.to_string();
        self.enemy = Some(enemy);
        self.state = EncounterState::InCombat;

        self.say(format!("You encounter a {}!", name));
        self.say(description);
        self.sink.emit(GameEvent::CombatStarted {
            enemy: name.clone(),
        });
        Ok(name)
    }

    /// Resolve one combat round
    pub fn player_action(&mut self, action: CombatAction) -> Result<RoundOutcome, GameError> {
        let result = self.player_action_inner(action);
        self.checked(result)
    }

    /// Try to escape the current fight
    pub fn flee(&mut self) -> Result<RoundOutcome, GameError> {
        self.player_action(CombatAction::Flee)
    }

    fn player_action_inner(&mut self, action: CombatAction) -> Result<RoundOutcome, GameError> {
        if self.state != EncounterState::InCombat {
            return Err(GameError::NotInCombat);
        }
        let player = self.player.as_mut().ok_or(GameError::NoPlayer)?;
        if !player.is_alive() {
            return Err(GameError::PlayerDefeated);
        }
        let enemy = self.enemy.as_mut().ok_or(GameError::NotInCombat)?;

        let report = resolve_round(player, enemy, &action, &mut self.rng)?;
        for message in report.messages {
            self.say(message);
        }

        match report.outcome {
            RoundOutcome::Continue => {}
            RoundOutcome::Victory => self.victory(),
            RoundOutcome::Defeat => self.defeat(),
            RoundOutcome::Fled => {
                if let Some(player) = &self.player {
                    info!("{} fled", player.name());
                }
                self.end_encounter(RoundOutcome::Fled);
            }
        }
        Ok(report.outcome)
    }

    fn end_encounter(&mut self, outcome: RoundOutcome) {
        self.enemy = None;
        self.state = EncounterState::Idle;
        self.sink.emit(GameEvent::CombatEnded(outcome));
    }

    /// Award XP, gold and loot for the defeated enemy
    fn victory(&mut self) {
        let Some(enemy) = self.enemy.take() else {
            self.end_encounter(RoundOutcome::Victory);
            return;
        };
        let Some(player) = self.player.as_mut() else {
            self.end_encounter(RoundOutcome::Victory);
            return;
        };

        let mut messages = vec![format!("You defeated {}!", enemy.name())];
        messages.extend(player.add_xp(enemy.xp_reward, &mut self.rng));
        player.gold = player.gold.saturating_add(enemy.gold_reward);
        messages.push(format!("You receive {} gold.", enemy.gold_reward));
        info!(
            "{} defeated {} for {} XP and {} gold",
            player.name(),
            enemy.name(),
            enemy.xp_reward,
            enemy.gold_reward
        );

        let loot = enemy.roll_loot(&self.catalog, &mut self.rng);
        if !loot.is_empty() {
            messages.push("Loot found:".to_string());
            for item in loot {
                messages.push(format!("- {}", item.name));
                player.add_item(item);
            }
        }

        for message in messages {
            self.say(message);
        }
        self.end_encounter(RoundOutcome::Victory);
    }

    /// The character is gone; a new one or a load is needed
    fn defeat(&mut self) {
        let enemy_name = self
            .enemy
            .as_ref()
            .map_or("an unknown foe".to_string(), |e| e.name().to_string());
        if let Some(player) = self.player.take() {
            warn!("{} was defeated by {}. Game over.", player.name(), enemy_name);
            self.say(format!(
                "{} was defeated by {}. Game over.",
                player.name(),
                enemy_name
            ));
        }
        self.end_encounter(RoundOutcome::Defeat);
    }

    /// Use or equip the item in a 1-based inventory slot
    pub fn use_inventory_item(&mut self, index: usize) -> Result<String, GameError> {
        let result = self.use_inventory_item_inner(index);
        self.checked(result)
    }

    fn use_inventory_item_inner(&mut self, index: usize) -> Result<String, GameError> {
        self.living_player()?;
        let player = self.player.as_mut().ok_or(GameError::NoPlayer)?;
        if index == 0 || index > player.inventory.len() {
            return Err(GameError::InvalidIndex(index));
        }

        let message = player.use_item_at(index - 1)?;
        info!("{} used item {}", player.name(), index);
        self.say(message.clone());
        Ok(message)
    }

    /// Write the current character to this user's save file
    pub fn save(&mut self) -> Result<PathBuf, GameError> {
        let result = self.save_inner();
        self.checked(result)
    }

    fn save_inner(&mut self) -> Result<PathBuf, GameError> {
        let player = self.player.as_ref().ok_or(GameError::NoPlayer)?;
        let state = snapshot(player, &self.location, &self.catalog);
        let path = self.store.save(&self.identity, &state)?;
        self.say(format!("Game saved for {}.", self.identity.username));
        Ok(path)
    }

    /// Replace the current character with this user's save.
    ///
    /// Nothing changes unless the save was read successfully.
    pub fn load(&mut self) -> Result<(), GameError> {
        let result = self.load_inner();
        self.checked(result)
    }

    fn load_inner(&mut self) -> Result<(), GameError> {
        let document = self.store.load(&self.identity)?;
        let restored = restore(&document, &self.catalog);

        info!(
            "Loaded {} for {} (version {:?})",
            restored.player.name(),
            self.identity.username,
            restored.version
        );
        let message = format!("Game loaded for {}.", restored.player.name());
        self.player = Some(restored.player);
        if let Some(location) = restored.location_marker {
            self.location = location;
        }
        let was_fighting = self.state == EncounterState::InCombat;
        self.enemy = None;
        self.state = EncounterState::Idle;

        self.say(message);
        if was_fighting {
            self.sink.emit(GameEvent::CombatEnded(RoundOutcome::Fled));
        }
        Ok(())
    }

    /// Run a parsed command
    pub fn execute(&mut self, command: Command) -> Result<(), GameError> {
        match command {
            Command::Explore => self.explore().map(|_| ()),
            Command::Save => self.save().map(|_| ()),
            Command::Load => self.load(),
            Command::CreatePlayer { name, class } => self.create_player(&name, class),
            Command::Combat(action) => self.player_action(action).map(|_| ()),
            Command::UseItem(index) => self.use_inventory_item(index).map(|_| ()),
        }
    }

    pub fn player_status(&self) -> Option<PlayerStatus> {
        let player = self.player.as_ref()?;
        let c = player.combatant();
        let weapon = player.equipped_weapon.as_ref().map(|item| match item.as_weapon() {
            Some(w) => match &w.damage_dice {
                Some(dice) => format!("{} (damage: +{}, {})", item.name, w.damage, dice),
                None => format!("{} (damage: +{})", item.name, w.damage),
            },
            None => item.name.clone(),
        });
        let armor = player.equipped_armor.as_ref().map(|item| match item.as_armor() {
            Some(a) => format!("{} (+{} defense)", item.name, a.defense),
            None => item.name.clone(),
        });
        let effects = player
            .effects()
            .active_effects()
            .iter()
            .map(|e| format!("{}: {} ({} rounds left)", e.source, e.effect, e.remaining_turns))
            .collect();

        Some(PlayerStatus {
            name: c.name.clone(),
            class: player.class,
            level: player.level,
            hp: c.hp,
            max_hp: c.max_hp,
            gold: player.gold,
            xp: player.xp,
            xp_to_next: player.xp_to_next_level(),
            attack: c.attack_power,
            defense: c.defense_power,
            total_attack: player.total_attack(),
            total_defense: player.total_defense(),
            weapon,
            armor,
            effects,
        })
    }

    /// The current enemy, only while in combat
    pub fn enemy_status(&self) -> Option<String> {
        match (self.state, &self.enemy) {
            (EncounterState::InCombat, Some(enemy)) => Some(enemy.to_string()),
            _ => None,
        }
    }

    /// Numbered inventory lines, starting at 1
    pub fn inventory_listing(&self) -> Vec<String> {
        self.player
            .as_ref()
            .map(|p| {
                p.inventory
                    .iter()
                    .enumerate()
                    .map(|(i, item)| format!("{}. {}", i + 1, item))
                    .collect()
            })
            .unwrap_or_default()
    }
}
