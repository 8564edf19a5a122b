//! Experience curve: maps levels to cumulative experience thresholds and back.
//!
//! The cost of level `i` is `base * growth^(i - 1)`, so the threshold of a level
//! is a geometric sum:
//!
//! | level | cost  | threshold |
//! |-------|-------|-----------|
//! | 1     | 100   | 100       |
//! | 2     | 110   | 210       |
//! | 3     | 121   | 331       |
//!
//! (with the default `base = 100`, `growth = 1.1`).

use serde::{Deserialize, Serialize};

use crate::config::LevelingConfig;

/// The curve parameters, captured from a configuration snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceCurve {
    pub base_exp_per_level: f64,
    pub growth_factor: f64,
    pub max_level: u32,
}

impl Default for ExperienceCurve {
    fn default() -> Self {
        Self::from_config(&LevelingConfig::default())
    }
}

impl ExperienceCurve {
    /// Capture the curve parameters of a configuration.
    pub fn from_config(config: &LevelingConfig) -> Self {
        Self {
            base_exp_per_level: config.base_exp_per_level,
            growth_factor: config.growth_factor,
            max_level: config.max_level,
        }
    }

    /// Experience needed to go from `level - 1` to `level`.
    fn level_cost(&self, level: u32) -> f64 {
        self.base_exp_per_level * self.growth_factor.powi(level as i32 - 1)
    }

    /// Cumulative experience required to reach `level`.
    pub fn experience_for_level(&self, level: u32) -> f64 {
        (1..=level).fold(0.0, |total, i| total + self.level_cost(i))
    }

    /// Highest level in `[0, max_level]` whose threshold is covered by `experience`.
    ///
    /// Accumulates the same terms in the same order as
    /// [`experience_for_level`](Self::experience_for_level), so
    /// `level_for_experience(experience_for_level(l)) == l` holds exactly.
    pub fn level_for_experience(&self, experience: f64) -> u32 {
        if experience.is_nan() || experience <= 0.0 {
            return 0;
        }

        let mut level = 0;
        let mut threshold = 0.0;
        while level < self.max_level {
            threshold += self.level_cost(level + 1);
            if threshold > experience {
                break;
            }
            level += 1;
        }
        level
    }

    /// Progress through the current level as a whole percentage in `[0, 100]`.
    ///
    /// Floors, so the value only reaches 100 at the cap.
    pub fn progress_percent(&self, experience: f64) -> u8 {
        let level = self.level_for_experience(experience);
        if level >= self.max_level {
            return 100;
        }

        let current = self.experience_for_level(level);
        let needed = self.experience_for_level(level + 1) - current;
        if needed <= 0.0 {
            return 100;
        }

        let percent = ((experience - current) / needed * 100.0).floor();
        percent.clamp(0.0, 99.0) as u8
    }

    /// Threshold of the maximum level; experience is never stored above it.
    pub fn max_experience(&self) -> f64 {
        self.experience_for_level(self.max_level)
    }

    /// Absolute experience between two levels, or 0 if either is out of range.
    pub fn experience_between(&self, from: u32, to: u32) -> f64 {
        if from > self.max_level || to > self.max_level {
            return 0.0;
        }
        (self.experience_for_level(to) - self.experience_for_level(from)).abs()
    }
}
