//! Combatants and damage resolution
//!
//! Handles:
//! - Defense reduction, doubled while blocking
//! - The one-shot blocking stance
//! - Attack rolls built from effective attack plus a weapon roll

use rand::{Rng, RngCore};
use tracing::{debug, info};

/// Shared state of anything that can fight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    pub name: String,
    /// Current hit points, always within [0, max_hp]
    pub hp: i32,
    pub max_hp: i32,
    /// Base attack before equipment
    pub attack_power: i32,
    /// Base defense before equipment
    pub defense_power: i32,
    /// Set by `block`, cleared by the next damage resolution
    pub blocking: bool,
}

/// Result of resolving incoming damage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageReport {
    /// Damage before defense
    pub incoming: i32,
    /// Defense applied (already doubled when blocking)
    pub defense: i32,
    /// HP actually lost
    pub taken: i32,
    pub blocked: bool,
    pub defeated: bool,
    pub message: String,
}

/// Result of an attack attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    /// Damage sent to the target; 0 when the attacker could not act
    pub potential: i32,
    /// Weapon or dice contribution included in `potential`
    pub weapon_roll: i32,
    /// `None` when the attacker was down
    pub damage: Option<DamageReport>,
    pub message: String,
}

impl Combatant {
    /// Create a combatant at full health
    pub fn new(name: &str, max_hp: i32, attack_power: i32, defense_power: i32) -> Self {
        let max_hp = max_hp.max(0);
        Self {
            name: name.to_string(),
            hp: max_hp,
            max_hp,
            attack_power,
            defense_power,
            blocking: false,
        }
    }

    /// Alive means HP above zero; there is no separate death flag
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply `amount` of damage against `defense`.
    ///
    /// Blocking doubles the defense for this hit only. The blocking flag is
    /// always false afterwards.
    pub fn absorb(&mut self, amount: i32, defense: i32) -> DamageReport {
        let blocked = self.blocking;
        let defense = if blocked { defense.saturating_mul(2) } else { defense };
        self.blocking = false;

        let reduced = amount.saturating_sub(defense).max(0);
        let hp_before = self.hp;
        self.hp = self.hp.saturating_sub(reduced).clamp(0, self.max_hp);
        let taken = hp_before - self.hp;

        let mut message = if blocked {
            format!("{} blocks and takes {} damage!", self.name, taken)
        } else {
            format!("{} takes {} damage.", self.name, taken)
        };
        debug!(
            "{} took {} (incoming {}, defense {}, blocked {})",
            self.name, taken, amount, defense, blocked
        );

        let defeated = !self.is_alive();
        if defeated {
            info!("{} has been defeated", self.name);
            message.push_str(&format!(" {} collapses!", self.name));
        }

        DamageReport {
            incoming: amount,
            defense,
            taken,
            blocked,
            defeated,
            message,
        }
    }

    /// Heal (cannot exceed max_hp); returns HP actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount.max(0)).clamp(0, self.max_hp);
        self.hp - before
    }

    /// Brace for the next hit
    pub fn block(&mut self) -> String {
        self.blocking = true;
        info!("{} raises their guard", self.name);
        format!("{} prepares to block!", self.name)
    }
}

/// Capability shared by players and enemies
pub trait Fighter {
    fn combatant(&self) -> &Combatant;

    fn combatant_mut(&mut self) -> &mut Combatant;

    /// Attack including equipment and active modifiers
    fn total_attack(&self) -> i32 {
        self.combatant().attack_power
    }

    /// Defense including equipment and active modifiers
    fn total_defense(&self) -> i32 {
        self.combatant().defense_power
    }

    /// Weapon or natural-attack roll added on top of `total_attack`
    fn damage_roll(&self, rng: &mut dyn RngCore) -> i32;

    /// Random swing applied after the weapon roll
    fn damage_jitter(&self, _rng: &mut dyn RngCore) -> i32 {
        0
    }

    fn name(&self) -> &str {
        &self.combatant().name
    }

    fn is_alive(&self) -> bool {
        self.combatant().is_alive()
    }

    fn take_damage(&mut self, amount: i32) -> DamageReport {
        let defense = self.total_defense();
        self.combatant_mut().absorb(amount, defense)
    }

    fn heal(&mut self, amount: i32) -> i32 {
        self.combatant_mut().heal(amount)
    }

    fn block(&mut self) -> String {
        self.combatant_mut().block()
    }

    /// Strike `target`; damage is floored at 1 before defense
    fn attack(&self, target: &mut dyn Fighter, rng: &mut dyn RngCore) -> AttackReport {
        if !self.is_alive() {
            return AttackReport {
                potential: 0,
                weapon_roll: 0,
                damage: None,
                message: format!("{} cannot attack while down.", self.name()),
            };
        }

        let base = self.total_attack();
        let weapon_roll = self.damage_roll(rng);
        let potential = base
            .saturating_add(weapon_roll)
            .saturating_add(self.damage_jitter(rng))
            .max(1);
        info!(
            "{} (atk {}) attacks {} for {} potential damage (roll {})",
            self.name(),
            base,
            target.name(),
            potential,
            weapon_roll
        );

        let report = target.take_damage(potential);
        let message = format!("{} attacks {}. {}", self.name(), target.name(), report.message);
        AttackReport {
            potential,
            weapon_roll,
            damage: Some(report),
            message,
        }
    }
}

/// Uniform swing in {-1, 0, +1}
pub fn swing<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.random_range(-1..=1)
}
