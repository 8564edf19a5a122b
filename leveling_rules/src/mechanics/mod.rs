//! Kill mechanics: victim categories and the stateless award formulas.
//!
//! A kill award is computed left to right:
//! 1. base experience from the victim's level and health, times the victim multiplier
//! 2. group multiplier, applied once to the shared pool
//! 3. level-difference scaling, per participant

use serde::{Deserialize, Serialize};

use crate::config::LevelingConfig;
use crate::entities::PlayerId;

/// Smallest award a valid kill can produce.
pub const MIN_AWARD: f64 = 1.0;

/// Victim categories with their own experience multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictimKind {
    /// Ordinary unit.
    Unit,
    /// Boss (V Blood carrier).
    VBlood,
}

impl VictimKind {
    /// Pick the category from the host's boss flag.
    pub fn from_boss_flag(is_boss: bool) -> Self {
        if is_boss {
            VictimKind::VBlood
        } else {
            VictimKind::Unit
        }
    }

    /// Get the experience multiplier for this category.
    pub fn multiplier(&self, config: &LevelingConfig) -> f64 {
        match self {
            VictimKind::Unit => config.unit_multiplier,
            VictimKind::VBlood => config.vblood_multiplier,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, VictimKind::VBlood)
    }
}

/// Everything the award formulas need to know about a kill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillContext {
    pub victim_level: u32,
    pub victim_max_health: f64,
    pub victim_kind: VictimKind,

    /// Players credited with the kill, unique, in first-seen order.
    participants: Vec<PlayerId>,
}

impl KillContext {
    /// Create a kill context. Duplicate participants are dropped.
    pub fn new(
        victim_level: u32,
        victim_max_health: f64,
        is_boss: bool,
        participants: impl IntoIterator<Item = PlayerId>,
    ) -> Self {
        let mut unique: Vec<PlayerId> = Vec::new();
        for id in participants {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        Self {
            victim_level,
            victim_max_health,
            victim_kind: VictimKind::from_boss_flag(is_boss),
            participants: unique,
        }
    }

    pub fn participants(&self) -> &[PlayerId] {
        &self.participants
    }

    /// Check if more than one player shares the kill.
    pub fn is_group_kill(&self) -> bool {
        self.participants.len() > 1
    }

    /// Award pool before per-player scaling: base experience plus group bonus.
    pub fn pool_experience(&self, config: &LevelingConfig) -> f64 {
        let base = base_experience(
            config,
            self.victim_level,
            self.victim_max_health,
            self.victim_kind,
        );
        apply_group_multiplier(config, base, self.is_group_kill())
    }
}

/// Base experience for a kill: `level * base multiplier + health / 10`, times the
/// victim multiplier, never below [`MIN_AWARD`].
pub fn base_experience(
    config: &LevelingConfig,
    victim_level: u32,
    victim_health: f64,
    kind: VictimKind,
) -> f64 {
    let health_bonus = victim_health / 10.0;
    let base = victim_level as f64 * config.base_exp_multiplier + health_bonus;

    (base * kind.multiplier(config)).max(MIN_AWARD)
}

/// Apply the group multiplier once to the shared amount.
pub fn apply_group_multiplier(config: &LevelingConfig, amount: f64, is_group: bool) -> f64 {
    if is_group {
        amount * config.group_multiplier
    } else {
        amount
    }
}

/// Penalise kills of lower-level victims: `amount * e^(-factor * (player - victim))`.
///
/// No penalty when the victim is at or above the player's level.
pub fn apply_level_scaling(
    config: &LevelingConfig,
    amount: f64,
    player_level: u32,
    victim_level: u32,
) -> f64 {
    if player_level <= victim_level {
        return amount;
    }

    let level_difference = (player_level - victim_level) as f64;
    amount * (-config.level_scaling_factor * level_difference).exp()
}
