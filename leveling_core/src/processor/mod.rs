//! Experience event processor - turns kills and rewards into store updates.
//!
//! A kill is processed in stages:
//! 1. **Pool**: base experience from the victim, times the group multiplier
//!    when more than one player took part
//! 2. **Filter**: participants already at the maximum level are skipped
//! 3. **Scaling**: each remaining participant gets the pool scaled by their
//!    level advantage over the victim, never below one point
//! 4. **Apply**: the award is validated and added to the store
//!
//! Every participant receives the same pool before scaling; the pool is not
//! split between them.

use leveling_rules::{
    apply_level_scaling, validate_experience, KillContext, PlayerId, ValidationError, MIN_AWARD,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::store::ExperienceStore;

/// Experience applied to one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub player: PlayerId,
    pub amount: f64,
    pub leveled_up: bool,
}

/// Entry point the host calls when an entity dies.
pub trait KillEventSink {
    fn on_entity_killed(
        &self,
        victim_level: u32,
        victim_max_health: f64,
        is_boss: bool,
        participants: &[PlayerId],
    );
}

/// Applies kill and reward events to an [`ExperienceStore`].
#[derive(Debug, Clone)]
pub struct ExperienceEventProcessor {
    store: Arc<ExperienceStore>,
}

impl ExperienceEventProcessor {
    /// Create a processor writing to the given store.
    pub fn new(store: Arc<ExperienceStore>) -> Self {
        Self { store }
    }

    /// Create a processor over a fresh store with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ExperienceStore::with_defaults()))
    }

    pub fn store(&self) -> &Arc<ExperienceStore> {
        &self.store
    }

    /// Award experience for a kill to every eligible participant.
    pub fn process_kill(&self, kill: &KillContext) -> Vec<Award> {
        if kill.participants().is_empty() {
            return Vec::new();
        }
        if let Err(err) = validate_experience(kill.victim_max_health) {
            tracing::warn!(error = %err, "rejected kill with invalid victim health");
            return Vec::new();
        }

        let config = self.store.config().snapshot();
        let pool = kill.pool_experience(&config);

        kill.participants()
            .iter()
            .filter_map(|&player| {
                let level = self.store.level(player);
                if level >= config.max_level {
                    return None;
                }
                let scaled =
                    apply_level_scaling(&config, pool, level, kill.victim_level).max(MIN_AWARD);
                self.apply(player, scaled)
            })
            .collect()
    }

    /// Award a flat amount to every participant below the cap, without group
    /// or level scaling (quest rewards and similar).
    pub fn process_batch_experience(&self, amount: f64, participants: &[PlayerId]) -> Vec<Award> {
        if participants.is_empty() || amount.is_nan() || amount <= 0.0 {
            return Vec::new();
        }

        let max_level = self.store.config().read(|config| config.max_level);
        participants
            .iter()
            .filter(|player| self.store.level(**player) < max_level)
            .filter_map(|&player| self.apply(player, amount))
            .collect()
    }

    /// Administrative award. Returns whether the player leveled up.
    pub fn try_give_experience(&self, player: PlayerId, amount: f64) -> Result<bool, ValidationError> {
        let amount = validate_experience(amount)?;
        if amount <= 0.0 {
            return Ok(false);
        }
        Ok(self.store.add_experience(player, amount))
    }

    /// Administrative award that ignores invalid amounts.
    pub fn give_experience(&self, player: PlayerId, amount: f64) -> bool {
        match self.try_give_experience(player, amount) {
            Ok(leveled_up) => leveled_up,
            Err(err) => {
                tracing::warn!(%player, error = %err, "rejected experience award");
                false
            }
        }
    }

    pub fn set_level(&self, player: PlayerId, level: u32) {
        self.store.set_level(player, level);
    }

    pub fn reset_progress(&self, player: PlayerId) {
        self.store.reset_progress(player);
    }

    pub fn clear_all(&self) {
        self.store.clear_all();
    }

    fn apply(&self, player: PlayerId, amount: f64) -> Option<Award> {
        match validate_experience(amount) {
            Ok(amount) => {
                let leveled_up = self.store.add_experience(player, amount);
                Some(Award {
                    player,
                    amount,
                    leveled_up,
                })
            }
            Err(err) => {
                tracing::warn!(%player, error = %err, "rejected computed award");
                None
            }
        }
    }
}

impl KillEventSink for ExperienceEventProcessor {
    fn on_entity_killed(
        &self,
        victim_level: u32,
        victim_max_health: f64,
        is_boss: bool,
        participants: &[PlayerId],
    ) {
        let kill = KillContext::new(
            victim_level,
            victim_max_health,
            is_boss,
            participants.iter().copied(),
        );
        let awards = self.process_kill(&kill);
        tracing::debug!(
            victim_level,
            is_boss,
            participants = kill.participants().len(),
            awarded = awards.len(),
            "kill processed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ProgressionEvent;
    use leveling_rules::LevelingConfig;

    fn processor_with(config: LevelingConfig) -> ExperienceEventProcessor {
        ExperienceEventProcessor::new(Arc::new(ExperienceStore::from(config)))
    }

    #[test]
    fn test_empty_participants_is_noop() {
        let processor = ExperienceEventProcessor::with_defaults();
        let rx = processor.store().events().subscribe();

        let kill = KillContext::new(10, 100.0, false, Vec::new());
        assert!(processor.process_kill(&kill).is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_solo_kill_with_level_advantage() {
        let processor = ExperienceEventProcessor::with_defaults();
        let killer = PlayerId(1);
        processor.set_level(killer, 20);
        let before = processor.store().experience(killer);

        let awards = processor.process_kill(&KillContext::new(10, 100.0, false, [killer]));

        assert_eq!(awards.len(), 1);
        // 20 * e^-1
        assert!((awards[0].amount - 7.357588823428847).abs() < 1e-9);
        assert!((processor.store().experience(killer) - before - awards[0].amount).abs() < 1e-6);
    }

    #[test]
    fn test_group_kill_shares_boosted_pool() {
        let processor = ExperienceEventProcessor::with_defaults();
        let (a, b) = (PlayerId(1), PlayerId(2));
        processor.set_level(b, 20);

        let awards = processor.process_kill(&KillContext::new(10, 100.0, false, [a, b]));

        assert_eq!(awards.len(), 2);
        // Level 0 killer takes the whole pool, 20 * 1.2
        assert!((awards[0].amount - 24.0).abs() < 1e-9);
        // Level 20 killer takes the same pool, scaled
        assert!((awards[1].amount - 24.0 * (-1.0f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_award_never_below_one() {
        let processor = ExperienceEventProcessor::with_defaults();
        let veteran = PlayerId(3);
        processor.set_level(veteran, 90);

        let awards = processor.process_kill(&KillContext::new(1, 10.0, false, [veteran]));

        assert_eq!(awards[0].amount, MIN_AWARD);
    }

    #[test]
    fn test_boss_kill_multiplier() {
        let processor = ExperienceEventProcessor::with_defaults();

        let unit = processor.process_kill(&KillContext::new(10, 100.0, false, [PlayerId(1)]));
        let boss = processor.process_kill(&KillContext::new(10, 100.0, true, [PlayerId(2)]));

        assert!((boss[0].amount / unit[0].amount - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_level_participant_skipped() {
        let processor = processor_with(LevelingConfig {
            max_level: 10,
            ..Default::default()
        });
        let (capped, fresh) = (PlayerId(1), PlayerId(2));
        processor.set_level(capped, 10);
        let capped_experience = processor.store().experience(capped);

        let awards = processor.process_kill(&KillContext::new(5, 50.0, false, [capped, fresh]));

        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].player, fresh);
        assert_eq!(processor.store().experience(capped), capped_experience);
    }

    #[test]
    fn test_kill_reports_level_up() {
        let processor = ExperienceEventProcessor::with_defaults();
        let rx = processor.store().events().subscribe();

        // 50 * 1 + 1000 / 10 = 150
        let awards = processor.process_kill(&KillContext::new(50, 1000.0, false, [PlayerId(4)]));

        assert!(awards[0].leveled_up);
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ProgressionEvent::ExperienceGained { .. }));
        assert!(events[1].is_level_up());
    }

    #[test]
    fn test_on_entity_killed() {
        let processor = ExperienceEventProcessor::with_defaults();

        processor.on_entity_killed(10, 100.0, false, &[PlayerId(5), PlayerId(5)]);

        // Duplicate ids count once, so no group bonus
        assert!((processor.store().experience(PlayerId(5)) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_health_rejected() {
        let processor = ExperienceEventProcessor::with_defaults();

        let awards = processor.process_kill(&KillContext::new(10, f64::INFINITY, false, [PlayerId(6)]));

        assert!(awards.is_empty());
        assert_eq!(processor.store().experience(PlayerId(6)), 0.0);
    }

    #[test]
    fn test_nan_health_rejected() {
        let processor = ExperienceEventProcessor::with_defaults();
        let rx = processor.store().events().subscribe();

        for is_boss in [false, true] {
            let kill = KillContext::new(10, f64::NAN, is_boss, [PlayerId(6), PlayerId(7)]);
            assert!(processor.process_kill(&kill).is_empty());
        }
        processor.on_entity_killed(10, f64::NAN, false, &[PlayerId(8)]);

        for raw in 6..=8 {
            assert_eq!(processor.store().experience(PlayerId(raw)), 0.0);
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_lowered_cap_skips_players_above_it() {
        let processor = ExperienceEventProcessor::with_defaults();
        let (veteran, fresh) = (PlayerId(1), PlayerId(2));
        processor.set_level(veteran, 20);
        let veteran_record = processor.store().record(veteran);

        processor
            .store()
            .config()
            .update(|config| config.max_level = 10)
            .unwrap();

        let awards = processor.process_kill(&KillContext::new(5, 50.0, false, [veteran, fresh]));
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].player, fresh);

        let batch = processor.process_batch_experience(30.0, &[veteran, fresh]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].player, fresh);

        assert_eq!(processor.store().record(veteran), veteran_record);
    }

    #[test]
    fn test_give_experience() {
        let processor = ExperienceEventProcessor::with_defaults();
        let player = PlayerId(7);

        assert!(processor.give_experience(player, 100.0));
        assert!(!processor.give_experience(player, 0.0));
        assert!(!processor.give_experience(player, -5.0));
        assert!(!processor.give_experience(player, f64::NAN));
        assert!(matches!(
            processor.try_give_experience(player, f64::INFINITY),
            Err(ValidationError::NonFinite(_))
        ));

        assert!((processor.store().experience(player) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_give_experience_skips_level_scaling() {
        let processor = ExperienceEventProcessor::with_defaults();
        let player = PlayerId(8);
        processor.set_level(player, 50);
        let before = processor.store().experience(player);

        processor.give_experience(player, 20.0);

        assert!((processor.store().experience(player) - before - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_batch_experience() {
        let processor = processor_with(LevelingConfig {
            max_level: 10,
            ..Default::default()
        });
        let (capped, a, b) = (PlayerId(1), PlayerId(2), PlayerId(3));
        processor.set_level(capped, 10);
        processor.set_level(b, 5);
        let b_before = processor.store().experience(b);

        let awards = processor.process_batch_experience(40.0, &[capped, a, b]);

        assert_eq!(awards.len(), 2);
        assert!(awards.iter().all(|award| award.amount == 40.0));
        assert_eq!(processor.store().experience(a), 40.0);
        assert!((processor.store().experience(b) - b_before - 40.0).abs() < 1e-9);

        assert!(processor.process_batch_experience(0.0, &[a]).is_empty());
        assert!(processor.process_batch_experience(10.0, &[]).is_empty());
    }

    #[test]
    fn test_admin_pass_through() {
        let processor = ExperienceEventProcessor::with_defaults();

        processor.set_level(PlayerId(1), 12);
        assert_eq!(processor.store().level(PlayerId(1)), 12);

        processor.reset_progress(PlayerId(1));
        assert_eq!(processor.store().level(PlayerId(1)), 0);

        processor.give_experience(PlayerId(2), 500.0);
        processor.clear_all();
        assert_eq!(processor.store().player_count(), 0);
    }
}
