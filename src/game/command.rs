//! Player commands parsed from text
//!
//! Grammar (case-insensitive):
//! - `explore` | `e`
//! - `save`, `load`
//! - `new <warrior|mage> [name...]`
//! - `attack` | `a`, `block` | `b`, `flee` | `f`
//! - `drink <potion name>` | `potion <potion name>`
//! - `use <n>` (1-based inventory slot)

use std::str::FromStr;

use thiserror::Error;

use crate::combat::CombatAction;
use crate::player::PlayerClass;

/// Everything the game accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Explore,
    Save,
    Load,
    CreatePlayer { name: String, class: PlayerClass },
    Combat(CombatAction),
    /// 1-based inventory index
    UseItem(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "explore" | "e" => Ok(Command::Explore),
            "save" => Ok(Command::Save),
            "load" => Ok(Command::Load),
            "attack" | "a" => Ok(Command::Combat(CombatAction::Attack)),
            "block" | "b" => Ok(Command::Combat(CombatAction::Block)),
            "flee" | "f" => Ok(Command::Combat(CombatAction::Flee)),
            "drink" | "potion" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("drink <potion name>"));
                }
                Ok(Command::Combat(CombatAction::UsePotion(rest.to_string())))
            }
            "use" => rest
                .parse::<usize>()
                .map(Command::UseItem)
                .map_err(|_| CommandError::Usage("use <item number>")),
            "new" => {
                let (class, name) = match rest.split_once(char::is_whitespace) {
                    Some((class, name)) => (class, name.trim()),
                    None => (rest, ""),
                };
                let class = class
                    .parse::<PlayerClass>()
                    .map_err(|_| CommandError::Usage("new <warrior|mage> [name]"))?;
                Ok(Command::CreatePlayer {
                    name: name.to_string(),
                    class,
                })
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
