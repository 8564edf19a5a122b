//! Player store - per-player level and experience records.
//!
//! Records live in a fixed set of shards selected by player id. Every
//! per-player mutation holds the read side of the outer lock and one shard
//! mutex, so updates to the same player never interleave while players in
//! other shards proceed in parallel. [`ExperienceStore::clear_all`] takes the
//! write side and acts as a global barrier.
//!
//! Events are collected under the lock and published after it is released,
//! which lets listeners call back into the store.

use leveling_rules::{ExperienceCurve, LevelingConfig, PlayerId, PlayerRecord, SharedConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::events::{EventBus, ProgressionEvent};

/// Default number of shards.
pub const DEFAULT_SHARDS: usize = 16;

type Shard = Mutex<HashMap<PlayerId, PlayerRecord>>;

/// Thread-safe store of player progression records.
#[derive(Debug)]
pub struct ExperienceStore {
    config: SharedConfig,
    shards: RwLock<Vec<Shard>>,
    events: Arc<EventBus>,
}

impl ExperienceStore {
    /// Create a store with its own event bus.
    pub fn new(config: SharedConfig) -> Self {
        Self::with_shards(config, DEFAULT_SHARDS)
    }

    /// Create a store with a specific shard count (at least one).
    pub fn with_shards(config: SharedConfig, shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| Mutex::new(HashMap::new()))
            .collect();

        Self {
            config,
            shards: RwLock::new(shards),
            events: Arc::new(EventBus::new()),
        }
    }

    /// Create a store with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SharedConfig::default())
    }

    /// Publish to an existing bus instead of a private one.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Curve for the current configuration.
    pub fn curve(&self) -> ExperienceCurve {
        self.config.read(ExperienceCurve::from_config)
    }

    /// Run `f` on the record of `player`, creating it on first access.
    fn with_record<T>(&self, player: PlayerId, f: impl FnOnce(&mut PlayerRecord) -> T) -> T {
        let shards = self.shards.read().unwrap_or_else(PoisonError::into_inner);
        let mut shard = lock_shard(&shards, player);
        f(shard.entry(player).or_default())
    }

    /// Add experience and recompute the level.
    ///
    /// Returns whether the level increased. Amounts `<= 0` are ignored.
    /// Experience beyond the maximum level's threshold is discarded.
    pub fn add_experience(&self, player: PlayerId, amount: f64) -> bool {
        if amount.is_nan() || amount <= 0.0 {
            return false;
        }

        let curve = self.curve();
        let (old_level, new_level) = self.with_record(player, |record| {
            let old_level = record.level;
            let mut experience = record.experience + amount;
            let mut level = curve.level_for_experience(experience);

            if level >= curve.max_level {
                level = curve.max_level;
                experience = curve.max_experience();
            }

            record.update(level, experience);
            (old_level, level)
        });

        let leveled_up = new_level > old_level;
        tracing::debug!(%player, amount, level = new_level, "experience added");

        let mut events = vec![ProgressionEvent::ExperienceGained { player, amount }];
        if leveled_up {
            events.push(ProgressionEvent::LevelChanged {
                player,
                old_level,
                new_level,
            });
        }
        self.events.publish(&events);

        leveled_up
    }

    /// Force a level, resetting experience to that level's exact threshold.
    ///
    /// Out-of-range levels are clamped to `[0, max_level]`.
    pub fn set_level(&self, player: PlayerId, level: u32) {
        let curve = self.curve();
        let level = level.min(curve.max_level);
        let experience = curve.experience_for_level(level);

        let old_level = self.with_record(player, |record| {
            let old_level = record.level;
            record.update(level, experience);
            old_level
        });

        tracing::info!(%player, old_level, new_level = level, "level set");
        if level != old_level {
            self.events.publish(&[ProgressionEvent::LevelChanged {
                player,
                old_level,
                new_level: level,
            }]);
        }
    }

    /// Drop a player back to level 0 with no experience.
    pub fn reset_progress(&self, player: PlayerId) {
        let old_level = self.with_record(player, |record| {
            let old_level = record.level;
            record.update(0, 0.0);
            old_level
        });

        tracing::info!(%player, old_level, "progress reset");
        if old_level > 0 {
            self.events.publish(&[ProgressionEvent::LevelChanged {
                player,
                old_level,
                new_level: 0,
            }]);
        }
    }

    /// Remove every record. Emits no events.
    pub fn clear_all(&self) {
        let shards = self.shards.write().unwrap_or_else(PoisonError::into_inner);
        let mut removed = 0;
        for shard in shards.iter() {
            let mut records = shard.lock().unwrap_or_else(PoisonError::into_inner);
            removed += records.len();
            records.clear();
        }
        tracing::info!(removed, "cleared all player records");
    }

    /// Install a record loaded from elsewhere, clamped into the valid range.
    ///
    /// Level and experience are reconciled to whichever shows more progress:
    /// a level above what the experience covers raises experience to that
    /// level's threshold, otherwise the level is derived from experience.
    pub fn insert_record(&self, player: PlayerId, mut record: PlayerRecord) {
        let curve = self.curve();
        if !record.experience.is_finite() || record.experience < 0.0 {
            tracing::warn!(%player, experience = record.experience, "discarding invalid experience");
            record.experience = 0.0;
        }

        let level = record.level.min(curve.max_level);
        let derived = curve.level_for_experience(record.experience);
        if level > derived {
            record.level = level;
            record.experience = curve.experience_for_level(level);
        } else {
            record.level = derived;
        }
        if record.level >= curve.max_level {
            record.level = curve.max_level;
            record.experience = curve.max_experience();
        }

        self.with_record(player, |existing| *existing = record);
    }

    /// Snapshot of a player's record.
    pub fn record(&self, player: PlayerId) -> PlayerRecord {
        self.with_record(player, |record| record.clone())
    }

    pub fn level(&self, player: PlayerId) -> u32 {
        self.with_record(player, |record| record.level)
    }

    pub fn experience(&self, player: PlayerId) -> f64 {
        self.with_record(player, |record| record.experience)
    }

    /// Progress through the current level, 0 to 100.
    pub fn progress_percent(&self, player: PlayerId) -> u8 {
        let experience = self.experience(player);
        self.curve().progress_percent(experience)
    }

    pub fn is_max_level(&self, player: PlayerId) -> bool {
        let max_level = self.config.read(|cfg| cfg.max_level);
        self.level(player) >= max_level
    }

    /// Experience still missing for the next level, 0 at the cap.
    pub fn experience_to_next_level(&self, player: PlayerId) -> f64 {
        let curve = self.curve();
        let (level, experience) = self.with_record(player, |record| (record.level, record.experience));

        if level >= curve.max_level {
            return 0.0;
        }
        (curve.experience_for_level(level + 1) - experience).max(0.0)
    }

    /// Number of materialized records.
    pub fn player_count(&self) -> usize {
        let shards = self.shards.read().unwrap_or_else(PoisonError::into_inner);
        shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }
}

impl Default for ExperienceStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl From<LevelingConfig> for ExperienceStore {
    fn from(config: LevelingConfig) -> Self {
        Self::new(SharedConfig::new(config))
    }
}

fn lock_shard(shards: &[Shard], player: PlayerId) -> MutexGuard<'_, HashMap<PlayerId, PlayerRecord>> {
    let index = (player.raw() % shards.len() as u64) as usize;
    shards[index].lock().unwrap_or_else(PoisonError::into_inner)
}
