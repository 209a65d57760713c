//! Play scenarios
//!
//! - Combat: damage ranges, full fights, potions and buffs
//! - Progression: XP curve and level-ups through victories
//! - Persistence: save/load through the game and on disk
//! - Explore: random events out of combat
//! - Accounts: registration, login and per-user saves

pub mod accounts;
pub mod combat;
pub mod explore;
pub mod persistence;
pub mod progression;
