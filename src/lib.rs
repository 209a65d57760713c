//! crossroads - turn-based text RPG engine
//!
//! Character creation, equipment, consumables, random encounters, leveling
//! and per-user save files for a single-player terminal game.

pub mod auth;
pub mod bestiary;
pub mod combat;
pub mod enemy;
pub mod game;
pub mod items;
pub mod names;
pub mod persistence;
pub mod player;
pub mod progression;

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub use game::{Command, EventSink, Game, GameError, GameEvent};

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "crossroads.toml";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `<user>_save.json` files
    pub save_dir: PathBuf,
    /// Username/password-hash store
    pub accounts_file: PathBuf,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
    /// Tracing filter used when RUST_LOG is not set
    pub log_filter: String,
    pub start_location: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saves"),
            accounts_file: PathBuf::from("accounts.json"),
            seed: None,
            log_filter: "crossroads=info".to_string(),
            start_location: game::DEFAULT_LOCATION.to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `CROSSROADS_*` variables
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("CROSSROADS_"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}
