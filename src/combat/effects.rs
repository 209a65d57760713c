//! Potion effects and timed stat modifiers
//!
//! Stat modifiers on attack or defense feed into effective combat stats until
//! they expire. Labelled effects are descriptive only and simply count down.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Stats a potion can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    AttackPower,
    DefensePower,
    /// Tracked for display; no combat math reads it
    MagicPower,
}

impl FromStr for Stat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "attack_power" | "attack" => Ok(Stat::AttackPower),
            "defense_power" | "defense" => Ok(Stat::DefensePower),
            "magic_power" | "magic" => Ok(Stat::MagicPower),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stat::AttackPower => "attack",
            Stat::DefensePower => "defense",
            Stat::MagicPower => "magic",
        };
        write!(f, "{}", s)
    }
}

/// Effect carried by a potion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PotionEffect {
    /// Adds `amount` to a stat for `duration` combat rounds
    Modifier { stat: Stat, amount: i32, duration: u32 },
    /// Opaque effect such as "invisibility"
    Label { label: String, duration: u32 },
}

impl PotionEffect {
    pub fn duration(&self) -> u32 {
        match self {
            PotionEffect::Modifier { duration, .. } | PotionEffect::Label { duration, .. } => {
                *duration
            }
        }
    }
}

impl std::fmt::Display for PotionEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PotionEffect::Modifier { stat, amount, duration } => {
                write!(f, "{:+} {}", amount, stat)?;
                if *duration > 0 {
                    write!(f, " for {} turns", duration)?;
                }
                Ok(())
            }
            PotionEffect::Label { label, duration } => {
                let mut pretty = label.replace('_', " ");
                if let Some(first) = pretty.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                write!(f, "{}", pretty)?;
                if *duration > 0 {
                    write!(f, " for {} turns", duration)?;
                }
                Ok(())
            }
        }
    }
}

/// An effect currently running on an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEffect {
    /// Name of the potion that applied it
    pub source: String,
    pub effect: PotionEffect,
    /// Rounds left before expiry
    pub remaining_turns: u32,
}

impl ActiveEffect {
    pub fn is_expired(&self) -> bool {
        self.remaining_turns == 0
    }
}

/// Effects on a single entity
#[derive(Debug, Clone, Default)]
pub struct EntityEffects {
    effects: Vec<ActiveEffect>,
}

impl EntityEffects {
    /// Create new empty effects
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect; drinking the same potion again refreshes its duration.
    /// Effects with no duration are instantaneous and not tracked.
    pub fn add(&mut self, source: &str, effect: PotionEffect) {
        let duration = effect.duration();
        if duration == 0 {
            return;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.source == source) {
            existing.remaining_turns = existing.remaining_turns.max(duration);
        } else {
            self.effects.push(ActiveEffect {
                source: source.to_string(),
                effect,
                remaining_turns: duration,
            });
        }
    }

    /// Sum of active modifiers for a stat
    pub fn modifier(&self, stat: Stat) -> i32 {
        self.effects
            .iter()
            .filter(|e| !e.is_expired())
            .filter_map(|e| match e.effect {
                PotionEffect::Modifier { stat: s, amount, .. } if s == stat => Some(amount),
                _ => None,
            })
            .fold(0, i32::saturating_add)
    }

    /// Count down one round; returns the sources that just expired
    pub fn tick_all(&mut self) -> Vec<String> {
        for effect in &mut self.effects {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }

        let expired: Vec<String> = self
            .effects
            .iter()
            .filter(|e| e.is_expired())
            .map(|e| e.source.clone())
            .collect();
        if !expired.is_empty() {
            debug!("Effects expired: {:?}", expired);
        }

        self.effects.retain(|e| !e.is_expired());
        expired
    }

    /// Get all active effects
    pub fn active_effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
