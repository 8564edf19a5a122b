//! Presentation utilities - read-only formatting of progression state.
//!
//! Nothing here mutates the store. [`LevelSummary`] gathers one player's state
//! so the host can render it as rich text.

mod band;

pub use band::*;

use leveling_rules::{ExperienceCurve, PlayerId};
use serde::{Deserialize, Serialize};

use crate::store::ExperienceStore;

/// Default progress bar width in characters.
pub const DEFAULT_BAR_LENGTH: usize = 20;

/// Format experience with a K or M suffix and one decimal place.
pub fn format_experience(experience: f64) -> String {
    if experience >= 1_000_000.0 {
        format!("{:.1}M", experience / 1_000_000.0)
    } else if experience >= 1_000.0 {
        format!("{:.1}K", experience / 1_000.0)
    } else {
        format!("{:.0}", experience)
    }
}

/// Text progress bar such as `[█████░░░░░] 50%`.
pub fn progress_bar(percent: u8, length: usize) -> String {
    let percent = percent.min(100);
    let filled = ((length as f64 * percent as f64 / 100.0).round() as usize).min(length);

    format!(
        "[{}{}] {}%",
        "█".repeat(filled),
        "░".repeat(length - filled),
        percent
    )
}

/// Absolute experience between two levels, 0 if either is out of range.
pub fn experience_difference(curve: &ExperienceCurve, from: u32, to: u32) -> f64 {
    curve.experience_between(from, to)
}

/// Hours until the next level at a steady rate, 0 at the cap or for
/// non-positive rates.
pub fn estimate_hours_to_next_level(store: &ExperienceStore, player: PlayerId, exp_per_hour: f64) -> f64 {
    if exp_per_hour.is_nan() || exp_per_hour <= 0.0 || store.is_max_level(player) {
        return 0.0;
    }
    store.experience_to_next_level(player) / exp_per_hour
}

/// One player's progression, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub player: PlayerId,
    pub level: u32,
    pub max_level: u32,
    pub experience: f64,
    pub experience_to_next: f64,
    pub progress_percent: u8,
}

impl LevelSummary {
    /// Read a player's current state from the store.
    pub fn for_player(store: &ExperienceStore, player: PlayerId) -> Self {
        let record = store.record(player);
        let curve = store.curve();

        Self {
            player,
            level: record.level,
            max_level: curve.max_level,
            experience: record.experience,
            experience_to_next: store.experience_to_next_level(player),
            progress_percent: curve.progress_percent(record.experience),
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.max_level
    }

    pub fn color(&self) -> &'static str {
        level_color(self.level)
    }

    pub fn title(&self) -> &'static str {
        level_title(self.level, self.max_level)
    }

    pub fn progress_bar(&self, length: usize) -> String {
        progress_bar(self.progress_percent, length)
    }

    /// Multi-line status block with rich-text color markup.
    pub fn to_status_string(&self) -> String {
        let mut status = format!(
            "<color={}>Level {}</color> ({})",
            self.color(),
            self.level,
            self.title()
        );

        if self.is_max_level() {
            status.push_str(" - Max level reached!\n");
            status.push_str(&format!(
                "Total experience: {}",
                format_experience(self.experience)
            ));
            return status;
        }

        status.push('\n');
        status.push_str(&format!(
            "Experience: {} | Next level in: {}\n",
            format_experience(self.experience),
            format_experience(self.experience_to_next)
        ));
        status.push_str(&format!(
            "Progress: {}",
            self.progress_bar(DEFAULT_BAR_LENGTH)
        ));
        status
    }
}
